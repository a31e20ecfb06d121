//! Pattern-based identifier extraction.
//!
//! Extraction runs in a fixed order so that later categories can exclude text
//! already claimed by earlier ones: cards before phones, phones and reference
//! ids before bank accounts, absolute links before cue-anchored bare domains.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use url::Url;

use super::{Intel, IntelCategory};

static CARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[0-9]{4}[\s\-]?){3}[0-9]{4}\b").expect("card pattern"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?:\+|00)?91[\s\-\.]?)?(?:[6-9][0-9]{2}[\s\-\.]?[0-9]{3}[\s\-\.]?[0-9]{4}|[6-9][0-9]{4}[\s\-\.]?[0-9]{5})\b",
    )
    .expect("phone pattern")
});

static LABELLED_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:call|contact|phone|mobile|whatsapp|reach|number)\b[\s:@\-]*(?:\+?91[\s\-]?)?([6-9][0-9]{9})\b",
    )
    .expect("labelled phone pattern")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}\b").expect("email pattern")
});

static UPI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9][a-z0-9.\-_]{1,49}@([a-z][a-z0-9]{1,29})\b").expect("upi pattern")
});

static IFSC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[a-z]{4}0[a-z0-9]{6}\b").expect("ifsc pattern"));

static CASE_ID_RE: Lazy<Regex> =
    Lazy::new(|| labelled_id_pattern("reference|complaint|ticket|case|ref"));

static POLICY_NUMBER_RE: Lazy<Regex> = Lazy::new(|| labelled_id_pattern("policy"));

static ORDER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| labelled_id_pattern("order|booking|tracking"));

static LABELLED_BANK_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:\ba/c|\bacct|\baccount)(?:\s*(?:no|number|num)\b)?[\s\.\-:#]*([0-9]{9,18})",
        r"(?i)\b(?:bank|savings|saving|current)\b(?:\s*(?:a/c|account))?(?:\s*(?:no|number|num)\b)?[\s\.\-:#]*([0-9]{9,18})",
        r"(?i)\b(?:deposit|transfer)\b[\s\w]{0,40}?\b(?:to|into)\b[\s:]*([0-9]{9,18})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("bank pattern"))
    .collect()
});

static BARE_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{9,18}\b").expect("digit run pattern"));

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://|www\.)[^\s<>"'\)\]\}]+"#).expect("link pattern")
});

static SHORTENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:bit\.ly|goo\.gl|tinyurl\.com|t\.co|is\.gd|buff\.ly|ow\.ly|rebrand\.ly|shorturl\.at)/[^\s<>"'\)\]\}]+"#,
    )
    .expect("shortener pattern")
});

static CUE_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:click|visit|open|go\s*to|link)\b[\s:]*([a-z0-9][a-z0-9\-]*(?:\.[a-z0-9\-]+)*\.[a-z]{2,}(?:/[^\s<>"']*)?)"#,
    )
    .expect("cue domain pattern")
});

fn labelled_id_pattern(labels: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\b(?:{})\b(?:\s*(?:id|no|number|num)\b)?\.?(?:\s+is)?[\s\.\-:#]*([a-z0-9]{{6,20}})\b",
        labels
    ))
    .expect("labelled id pattern")
}

/// Payment-provider handles accepted after `@` in a UPI id.
const UPI_PROVIDERS: &[&str] = &[
    "ybl", "paytm", "okaxis", "okhdfcbank", "oksbi", "okicici", "apl", "axl", "ibl", "sbi",
    "hdfc", "icici", "axis", "kotak", "pnb", "bob", "upi", "axisbank", "hdfcbank", "sbiupi",
    "icicipay", "aubank", "equitas", "federal", "indus", "rbl", "yes", "idfc", "bandhan",
    "ujjivan", "union", "canara", "indian", "fbl", "waicici", "wahdfcbank",
];

/// Mail providers that never count as a UPI handle.
const EMAIL_PROVIDERS: &[&str] = &[
    "gmail", "yahoo", "hotmail", "outlook", "rediffmail", "mail", "proton", "icloud", "live",
];

/// Hosts whose links are never reported. Entries starting with `.` match any
/// host ending in them; others match the host itself or any subdomain.
const TRUSTED_DOMAINS: &[&str] = &[
    "google.com",
    "google.co.in",
    ".gov.in",
    "nic.in",
    "sbi.co.in",
    "onlinesbi.com",
    "icicibank.com",
    "hdfcbank.com",
    "axisbank.com",
    "kotak.com",
    "pnbindia.in",
    "bankofbaroda.in",
    "canarabank.com",
    "rbi.org.in",
    "npci.org.in",
    "upi.org",
    "bhimupi.org",
    "paytm.com",
    "phonepe.com",
    "gpay.com",
    "amazonpay.in",
    "microsoft.com",
    "apple.com",
    "amazon.in",
    "flipkart.com",
];

const LINK_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', ')', '}', ']', '>'];

/// Stateless extractor turning free text into [`Intel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntelExtractor;

impl IntelExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts every recognised identifier from `text`.
    ///
    /// Values are de-duplicated within the call. Never fails: unmatched text
    /// yields an empty collection.
    pub fn extract(&self, text: &str) -> Intel {
        let mut scan = Scan::new(text);
        scan.cards();
        scan.phones();
        scan.emails();
        scan.upi_ids();
        scan.ifsc_codes();
        scan.reference_ids();
        scan.bank_accounts();
        scan.links();
        scan.intel
    }
}

/// Returns true if a link's host is on the trusted allowlist.
pub fn is_trusted_link(link: &str) -> bool {
    let Some(host) = link_host(link) else {
        return false;
    };
    TRUSTED_DOMAINS.iter().any(|domain| {
        if domain.starts_with('.') {
            host.ends_with(domain)
        } else {
            host == *domain || host.ends_with(&format!(".{}", domain))
        }
    })
}

fn link_host(link: &str) -> Option<String> {
    let lower = link.to_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        lower
    } else {
        format!("http://{}", lower)
    };
    Url::parse(&candidate)
        .ok()?
        .host_str()
        .map(|host| host.to_string())
}

/// Canonical national number for an Indian mobile, if the digits form one.
fn national_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        12 if digits.starts_with("91") => &digits[2..],
        14 if digits.starts_with("0091") => &digits[4..],
        _ => return None,
    };
    matches!(national.as_bytes()[0], b'6'..=b'9').then(|| national.to_string())
}

/// 10 digits starting 6-9, or 12 digits `91` followed by 6-9.
fn is_phone_like(digits: &str) -> bool {
    let bytes = digits.as_bytes();
    match bytes.len() {
        10 => matches!(bytes[0], b'6'..=b'9'),
        12 => digits.starts_with("91") && matches!(bytes[2], b'6'..=b'9'),
        _ => false,
    }
}

fn overlaps(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|span| span.start < range.end && range.start < span.end)
}

/// Working state for one extraction pass.
struct Scan<'t> {
    text: &'t str,
    intel: Intel,
    card_spans: Vec<Range<usize>>,
    link_spans: Vec<Range<usize>>,
    phone_numbers: HashSet<String>,
    reference_tokens: HashSet<String>,
}

impl<'t> Scan<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            intel: Intel::new(),
            card_spans: Vec::new(),
            link_spans: Vec::new(),
            phone_numbers: HashSet::new(),
            reference_tokens: HashSet::new(),
        }
    }

    fn byte_before(&self, index: usize) -> Option<u8> {
        index.checked_sub(1).map(|i| self.text.as_bytes()[i])
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.text.as_bytes().get(index).copied()
    }

    fn digit_bounded(&self, range: &Range<usize>) -> bool {
        !self.byte_before(range.start).is_some_and(|b| b.is_ascii_digit())
            && !self.byte_at(range.end).is_some_and(|b| b.is_ascii_digit())
    }

    fn cards(&mut self) {
        for m in CARD_RE.find_iter(self.text) {
            let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
            if digits.len() == 16 {
                self.card_spans.push(m.range());
                self.intel.push(IntelCategory::CardNumber, digits);
            }
        }
    }

    fn phones(&mut self) {
        let mut found: Vec<(usize, String)> = Vec::new();

        for m in PHONE_RE.find_iter(self.text) {
            let range = m.range();
            if self.byte_before(range.start).is_some_and(|b| b.is_ascii_digit())
                || overlaps(&self.card_spans, &range)
            {
                continue;
            }
            if let Some(national) = national_number(m.as_str()) {
                found.push((range.start, national));
            }
        }

        for caps in LABELLED_PHONE_RE.captures_iter(self.text) {
            let Some(number) = caps.get(1) else { continue };
            if overlaps(&self.card_spans, &number.range()) {
                continue;
            }
            if let Some(national) = national_number(number.as_str()) {
                found.push((number.start(), national));
            }
        }

        found.sort_by_key(|(start, _)| *start);
        for (_, national) in found {
            self.intel
                .push(IntelCategory::Phone, format!("+91{}", national));
            self.phone_numbers.insert(national);
        }
    }

    fn emails(&mut self) {
        for m in EMAIL_RE.find_iter(self.text) {
            self.intel.push(IntelCategory::Email, m.as_str().to_lowercase());
        }
    }

    fn upi_ids(&mut self) {
        for caps in UPI_RE.captures_iter(self.text) {
            let (Some(whole), Some(provider)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // `name@host.tld` is an email address, not a handle.
            let rest = &self.text[whole.end()..];
            if rest.starts_with('.')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphanumeric())
            {
                continue;
            }
            let provider = provider.as_str().to_lowercase();
            if EMAIL_PROVIDERS.contains(&provider.as_str()) {
                continue;
            }
            let known = UPI_PROVIDERS.contains(&provider.as_str())
                || provider.ends_with("bank")
                || provider.ends_with("upi");
            if known {
                self.intel
                    .push(IntelCategory::Upi, whole.as_str().to_lowercase());
            }
        }
    }

    fn ifsc_codes(&mut self) {
        for m in IFSC_RE.find_iter(self.text) {
            self.intel
                .push(IntelCategory::IfscCode, m.as_str().to_uppercase());
        }
    }

    fn reference_ids(&mut self) {
        let labelled = [
            (IntelCategory::CaseId, &*CASE_ID_RE),
            (IntelCategory::PolicyNumber, &*POLICY_NUMBER_RE),
            (IntelCategory::OrderNumber, &*ORDER_NUMBER_RE),
        ];
        for (category, pattern) in labelled {
            for caps in pattern.captures_iter(self.text) {
                let Some(token) = caps.get(1) else { continue };
                let token = token.as_str();
                if !token.chars().any(|c| c.is_ascii_digit()) {
                    continue;
                }
                let value = token.to_uppercase();
                self.reference_tokens.insert(value.clone());
                self.intel.push(category, value);
            }
        }
    }

    fn bank_accounts(&mut self) {
        let mut found: Vec<(usize, String)> = Vec::new();

        for pattern in LABELLED_BANK_RES.iter() {
            for caps in pattern.captures_iter(self.text) {
                if let Some(digits) = caps.get(1) {
                    found.push((digits.start(), digits.as_str().to_string()));
                }
            }
        }
        for m in BARE_DIGITS_RE.find_iter(self.text) {
            found.push((m.start(), m.as_str().to_string()));
        }

        found.sort_by_key(|(start, _)| *start);
        for (start, digits) in found {
            let range = start..start + digits.len();
            if !self.digit_bounded(&range)
                || overlaps(&self.card_spans, &range)
                || is_phone_like(&digits)
                || self.phone_numbers.contains(&digits)
                || self.reference_tokens.contains(&digits)
            {
                continue;
            }
            self.intel.push(IntelCategory::BankAccount, digits);
        }
    }

    fn links(&mut self) {
        for m in LINK_RE.find_iter(self.text) {
            self.link_spans.push(m.range());
            self.keep_link(m.as_str().to_string());
        }

        for m in SHORTENER_RE.find_iter(self.text) {
            let range = m.range();
            if overlaps(&self.link_spans, &range) {
                continue;
            }
            self.link_spans.push(range);
            self.keep_link(m.as_str().to_string());
        }

        for caps in CUE_DOMAIN_RE.captures_iter(self.text) {
            let Some(domain) = caps.get(1) else { continue };
            let range = domain.range();
            if overlaps(&self.link_spans, &range) {
                continue;
            }
            self.link_spans.push(range);
            self.keep_link(format!("http://{}", domain.as_str()));
        }
    }

    fn keep_link(&mut self, raw: String) {
        let link = raw.trim_end_matches(LINK_TRAILING_PUNCTUATION);
        if link.is_empty() || is_trusted_link(link) {
            return;
        }
        self.intel.push(IntelCategory::PhishingLink, link);
    }
}
