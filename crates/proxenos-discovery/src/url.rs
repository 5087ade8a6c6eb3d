//! Action URL construction.
//!
//! Discovery URL templates embed many placeholders (`<UI_LLCC>`, `<DC_LLCC>`,
//! …) the host never needs to fill. Instead of a placeholder-substitution
//! grammar, the builder strips the template down to its origin and path and
//! re-appends only the query parameters the host controls.

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::index::Action;
use url::Url;

/// Options controlling session URL construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    /// Sets `IsLicensedUser=1` when true.
    pub is_business_user: bool,
    /// Language tag mapped through the locale table for `ui` and `rs`.
    pub language_tag: String,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            is_business_user: false,
            language_tag: "en".to_string(),
        }
    }
}

/// Fixed language-tag to locale mapping for the `ui` and `rs` parameters.
const LOCALE_TABLE: &[(&str, &str)] = &[
    ("ar", "ar-SA"),
    ("de", "de-DE"),
    ("en", "en-US"),
    ("es", "es-ES"),
    ("fr", "fr-FR"),
    ("it", "it-IT"),
    ("ja", "ja-JP"),
    ("ko", "ko-KR"),
    ("nl", "nl-NL"),
    ("pl", "pl-PL"),
    ("pt", "pt-BR"),
    ("ru", "ru-RU"),
    ("tr", "tr-TR"),
    ("zh", "zh-CN"),
];

/// Maps a language tag to its locale code.
///
/// # Errors
///
/// Returns [`DiscoveryError::UnsupportedLanguage`] for tags outside the
/// table.
pub fn map_locale(language_tag: &str) -> DiscoveryResult<&'static str> {
    LOCALE_TABLE
        .iter()
        .find(|(tag, _)| *tag == language_tag)
        .map(|(_, locale)| *locale)
        .ok_or_else(|| DiscoveryError::unsupported_language(language_tag))
}

/// Builds the fully-qualified session URL for an action and file.
///
/// The template's scheme, host, and path are kept; its query placeholders
/// are dropped wholesale. If the template query carried an `edit=1` marker
/// it is preserved, then `ui`, `rs`, `IsLicensedUser`, and `wopisrc` are
/// appended in that order. `file_endpoint_base` is host configuration,
/// never derived from the template.
///
/// # Errors
///
/// [`DiscoveryError::Malformed`] when the template does not parse as a URL,
/// [`DiscoveryError::UnsupportedLanguage`] for an unmapped language tag.
///
/// # Example
///
/// ```
/// use proxenos_discovery::{build_action_url, UrlOptions};
/// # use proxenos_discovery::{Action, ActionName, Application};
/// # use std::sync::Arc;
/// use url::Url;
///
/// # let action = Action {
/// #     app: Arc::new(Application { name: "Excel".into(), icon_url: String::new() }),
/// #     name: ActionName::Edit,
/// #     extension: "xlsx".into(),
/// #     url_template: "https://x.example/edit?edit=1&ui=UI_LLCC&".into(),
/// # };
/// let base = Url::parse("https://host.example/wopi/files").unwrap();
/// let url = build_action_url(&action, "1234", &base, &UrlOptions::default()).unwrap();
/// assert!(url.as_str().starts_with("https://x.example/edit?edit=1&ui=en-US"));
/// ```
pub fn build_action_url(
    action: &Action,
    file_identifier: &str,
    file_endpoint_base: &Url,
    options: &UrlOptions,
) -> DiscoveryResult<Url> {
    let template = Url::parse(&action.url_template).map_err(|e| {
        DiscoveryError::malformed(format!(
            "action url template '{}' does not parse: {e}",
            action.url_template
        ))
    })?;

    let keep_edit_marker = template
        .query()
        .is_some_and(|query| query.split('&').any(|pair| pair == "edit=1"));

    let locale = map_locale(&options.language_tag)?;

    let mut url = template;
    url.set_query(None);
    url.set_fragment(None);

    let wopisrc = format!(
        "{}/{}",
        file_endpoint_base.as_str().trim_end_matches('/'),
        file_identifier
    );

    {
        let mut pairs = url.query_pairs_mut();
        if keep_edit_marker {
            pairs.append_pair("edit", "1");
        }
        pairs.append_pair("ui", locale);
        pairs.append_pair("rs", locale);
        pairs.append_pair(
            "IsLicensedUser",
            if options.is_business_user { "1" } else { "0" },
        );
        pairs.append_pair("wopisrc", &wopisrc);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ActionName, Application};
    use std::sync::Arc;

    fn edit_action(template: &str) -> Action {
        Action {
            app: Arc::new(Application {
                name: "Excel".to_string(),
                icon_url: "https://c.example/x.ico".to_string(),
            }),
            name: ActionName::Edit,
            extension: "xlsx".to_string(),
            url_template: template.to_string(),
        }
    }

    fn base() -> Url {
        Url::parse("https://host.example/wopi/files").unwrap()
    }

    #[test]
    fn test_edit_template_full_scenario() {
        let action = edit_action("https://x.example/edit?edit=1&ui=UI_LLCC");
        let options = UrlOptions {
            is_business_user: true,
            language_tag: "ar".to_string(),
        };

        let url = build_action_url(&action, "1234", &base(), &options).unwrap();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("x.example"));
        assert_eq!(url.path(), "/edit");

        let query = url.query().unwrap();
        let edit_pos = query.find("edit=1").unwrap();
        let ui_pos = query.find("ui=ar-SA").unwrap();
        let rs_pos = query.find("rs=ar-SA").unwrap();
        let licensed_pos = query.find("IsLicensedUser=1").unwrap();
        let wopisrc_pos = query.find("wopisrc=").unwrap();
        assert!(edit_pos < ui_pos);
        assert!(ui_pos < rs_pos);
        assert!(rs_pos < licensed_pos);
        assert!(licensed_pos < wopisrc_pos);

        let wopisrc = url
            .query_pairs()
            .find(|(key, _)| key == "wopisrc")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(wopisrc, "https://host.example/wopi/files/1234");
    }

    #[test]
    fn test_template_placeholders_are_dropped() {
        let action = edit_action("https://x.example/view?ui=UI_LLCC&rs=DC_LLCC&dchat=DISABLE_CHAT");
        let url = build_action_url(&action, "f1", &base(), &UrlOptions::default()).unwrap();

        let query = url.query().unwrap();
        assert!(!query.contains("UI_LLCC"));
        assert!(!query.contains("DC_LLCC"));
        assert!(!query.contains("dchat"));
        assert!(!query.contains("edit=1"));
    }

    #[test]
    fn test_deterministic_output() {
        let action = edit_action("https://x.example/edit?edit=1&ui=UI_LLCC");
        let options = UrlOptions::default();

        let first = build_action_url(&action, "f1", &base(), &options).unwrap();
        let second = build_action_url(&action, "f1", &base(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_language_changes_ui_and_rs_only() {
        let action = edit_action("https://x.example/edit?edit=1&ui=UI_LLCC");
        let english = build_action_url(&action, "f1", &base(), &UrlOptions::default()).unwrap();
        let arabic = build_action_url(
            &action,
            "f1",
            &base(),
            &UrlOptions {
                is_business_user: false,
                language_tag: "ar".to_string(),
            },
        )
        .unwrap();

        assert!(english.query().unwrap().contains("ui=en-US"));
        assert!(english.query().unwrap().contains("rs=en-US"));
        assert!(arabic.query().unwrap().contains("ui=ar-SA"));
        assert!(arabic.query().unwrap().contains("rs=ar-SA"));

        let wopisrc = |url: &Url| {
            url.query_pairs()
                .find(|(key, _)| key == "wopisrc")
                .map(|(_, value)| value.into_owned())
        };
        assert_eq!(wopisrc(&english), wopisrc(&arabic));
    }

    #[test]
    fn test_unmapped_language_tag_fails() {
        let action = edit_action("https://x.example/edit?edit=1");
        let result = build_action_url(
            &action,
            "f1",
            &base(),
            &UrlOptions {
                is_business_user: false,
                language_tag: "tlh".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(DiscoveryError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_unlicensed_user_flag() {
        let action = edit_action("https://x.example/edit");
        let url = build_action_url(&action, "f1", &base(), &UrlOptions::default()).unwrap();
        assert!(url.query().unwrap().contains("IsLicensedUser=0"));
    }

    #[test]
    fn test_trailing_slash_on_base_is_normalized() {
        let action = edit_action("https://x.example/edit");
        let slashed = Url::parse("https://host.example/wopi/files/").unwrap();
        let url = build_action_url(&action, "f1", &slashed, &UrlOptions::default()).unwrap();

        let wopisrc = url
            .query_pairs()
            .find(|(key, _)| key == "wopisrc")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(wopisrc, "https://host.example/wopi/files/f1");
    }

    #[test]
    fn test_unparseable_template_is_malformed() {
        let action = edit_action("not a url");
        let result = build_action_url(&action, "f1", &base(), &UrlOptions::default());
        assert!(matches!(result, Err(DiscoveryError::Malformed { .. })));
    }
}
