//! Tracking URL builder.

use url::form_urlencoded;
use url::Url;

use super::types::UtmParameters;

/// `base` with the UTM parameters appended to its query, form-encoded.
///
/// An existing query and fragment on `base` are kept. Empty parameters are
/// skipped. Without tracking data the link is `#`.
pub fn utm_url(base: &str, utm: Option<&UtmParameters>) -> String {
    let Some(utm) = utm else {
        return "#".to_string();
    };

    let pairs: Vec<(&str, &str)> = [
        ("utm_source", Some(utm.source.as_str())),
        ("utm_medium", Some(utm.medium.as_str())),
        ("utm_campaign", Some(utm.campaign.as_str())),
        ("utm_term", utm.term.as_deref()),
        ("utm_content", utm.content.as_deref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    .collect();

    if pairs.is_empty() {
        return base.to_string();
    }

    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().extend_pairs(pairs);
            url.into()
        }
        // Relative links such as `/landing#offer` have no base to resolve against.
        Err(_) => append_to_relative(base, &pairs),
    }
}

fn append_to_relative(base: &str, pairs: &[(&str, &str)]) -> String {
    let (path, fragment) = match base.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (base, None),
    };
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    let separator = match path.split_once('?') {
        None => "?",
        Some((_, "")) => "",
        Some(_) => "&",
    };
    let mut out = format!("{}{}{}", path, separator, query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm() -> UtmParameters {
        UtmParameters {
            source: "newsletter".into(),
            medium: "email".into(),
            campaign: "spring sale".into(),
            term: None,
            content: Some("été/2024".into()),
        }
    }

    #[test]
    fn builds_query_in_fixed_order() {
        assert_eq!(
            utm_url("https://example.com", Some(&utm())),
            "https://example.com/?utm_source=newsletter&utm_medium=email\
             &utm_campaign=spring+sale&utm_content=%C3%A9t%C3%A9%2F2024"
        );
    }

    #[test]
    fn existing_query_is_extended() {
        assert_eq!(
            utm_url("https://shop.example.com/?ref=home", Some(&utm())),
            "https://shop.example.com/?ref=home&utm_source=newsletter&utm_medium=email\
             &utm_campaign=spring+sale&utm_content=%C3%A9t%C3%A9%2F2024"
        );
    }

    #[test]
    fn fragment_stays_last() {
        let url = utm_url("https://shop.example.com/sale#promo", Some(&utm()));
        assert!(url.starts_with("https://shop.example.com/sale?utm_source=newsletter&"));
        assert!(url.ends_with("#promo"));
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn relative_links_keep_query_and_fragment() {
        let only_source = UtmParameters {
            source: "sms".into(),
            ..UtmParameters::default()
        };
        assert_eq!(
            utm_url("/landing?lang=fr#offer", Some(&only_source)),
            "/landing?lang=fr&utm_source=sms#offer"
        );
        assert_eq!(utm_url("/landing", Some(&only_source)), "/landing?utm_source=sms");
    }

    #[test]
    fn missing_tracking_is_a_placeholder() {
        assert_eq!(utm_url("https://example.com", None), "#");
    }

    #[test]
    fn empty_parameters_are_skipped() {
        let empty = UtmParameters::default();
        assert_eq!(utm_url("https://example.com", Some(&empty)), "https://example.com");
    }
}
