//! Built-in labeled corpus used when no training data is supplied.
//!
//! Legitimate entries are well-known sites; phishing entries are synthetic
//! look-alikes. Real deployments should train on a curated feed instead.

use super::{Label, TrainingExample, TrainingSet};

const LEGITIMATE_URLS: &[&str] = &[
    "https://www.google.com",
    "https://www.facebook.com",
    "https://www.amazon.com",
    "https://www.microsoft.com",
    "https://www.apple.com",
    "https://www.wikipedia.org",
    "https://www.github.com",
    "https://www.stackoverflow.com",
    "https://www.reddit.com",
    "https://www.twitter.com",
    "https://www.linkedin.com",
    "https://www.youtube.com",
    "https://www.instagram.com",
    "https://www.netflix.com",
    "https://www.spotify.com",
    "https://www.dropbox.com",
    "https://www.adobe.com",
    "https://www.salesforce.com",
    "https://www.oracle.com",
    "https://www.ibm.com",
    "https://docs.python.org/3/",
    "https://nodejs.org/en/",
    "https://reactjs.org/",
    "https://www.mongodb.com/",
    "https://www.postgresql.org/",
];

const PHISHING_URLS: &[&str] = &[
    "http://paypal-secure-login.suspicious.com/verify",
    "http://amazon-account-update.xyz/signin",
    "http://microsoft-security-alert.info/update-password",
    "http://apple-id-locked.net/unlock",
    "http://facebook-security-check.biz/verify-account",
    "http://google-account-suspended.tk/restore",
    "http://netflix-payment-failed.ml/update-billing",
    "http://linkedin-profile-views.ga/login",
    "http://instagram-verify-badge.cf/confirm",
    "http://twitter-security-alert.gq/verify",
    "http://dropbox-file-share.icu/download",
    "http://adobe-license-expired.online/renew",
    "http://outlook-mailbox-full.site/upgrade",
    "http://chase-fraud-alert.xyz/verify-account",
    "http://wellsfargo-security.info/login",
    "http://bankofamerica-alerts.net/verify",
    "http://usps-package-delivery.xyz/track",
    "http://fedex-shipment-notification.info/details",
    "http://dhl-package-arrival.biz/confirm",
    "http://irs-tax-refund.online/claim",
    "http://192.168.1.1/paypal-login",
    "http://amaz0n-account.com/signin",
    "http://g00gle-security.net/verify",
    "http://micr0soft-update.info/download",
    "http://app1e-id-verify.com/login",
];

/// Number of generated variations per template.
const VARIATIONS: usize = 20;

/// The built-in training corpus: fixed examples followed by generated
/// variations, in a stable order.
pub fn default_training_set() -> TrainingSet {
    let mut data = Vec::with_capacity(LEGITIMATE_URLS.len() + PHISHING_URLS.len() + VARIATIONS * 5);

    data.extend(
        LEGITIMATE_URLS
            .iter()
            .map(|url| TrainingExample::new(*url, Label::Legitimate)),
    );
    data.extend(
        PHISHING_URLS
            .iter()
            .map(|url| TrainingExample::new(*url, Label::Phishing)),
    );

    for i in 0..VARIATIONS {
        data.push(TrainingExample::new(
            format!("https://legitimate-site-{i}.com/page"),
            Label::Legitimate,
        ));
        data.push(TrainingExample::new(
            format!("https://www.company{i}.org/products"),
            Label::Legitimate,
        ));

        data.push(TrainingExample::new(
            format!("http://verify-account-{i}.xyz/login"),
            Label::Phishing,
        ));
        data.push(TrainingExample::new(
            format!("http://secure-update-{i}.tk/signin"),
            Label::Phishing,
        ));
        data.push(TrainingExample::new(
            format!("http://alert-security-{i}.ml/verify"),
            Label::Phishing,
        ));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_set_shape() {
        let data = default_training_set();
        assert_eq!(data.len(), 150);

        let phishing = data.iter().filter(|e| e.label == Label::Phishing).count();
        assert_eq!(phishing, 85);
        assert_eq!(data.len() - phishing, 65);
    }

    #[test]
    fn test_default_training_set_is_stable() {
        assert_eq!(default_training_set(), default_training_set());
    }
}
