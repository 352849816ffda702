//! Cookie transport for persisted-state tokens.

use yourdle_types::config::StorageConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub prefix: String,
    pub max_age_secs: u64,
}

impl CookieSettings {
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            prefix: config.cookie_prefix.clone(),
            max_age_secs: config.cookie_max_age_secs,
        }
    }

    pub fn cookie_name(&self, slug: &str) -> String {
        format!("{}-{}", self.prefix, slug)
    }

    /// Pull the slug's token out of a `Cookie` request header.
    pub fn read_token<'a>(&self, slug: &str, cookie_header: &'a str) -> Option<&'a str> {
        let name = self.cookie_name(slug);
        cookie_header
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// `Set-Cookie` value scoping the token to the game's path.
    pub fn set_cookie(&self, slug: &str, token: &str) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/{}; SameSite=Lax; Secure",
            self.cookie_name(slug),
            token,
            self.max_age_secs,
            slug
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CookieSettings {
        CookieSettings {
            prefix: "yourdle".into(),
            max_age_secs: 31_536_000,
        }
    }

    #[test]
    fn finds_token_among_other_cookies() {
        let header = "theme=dark; yourdle-pets=abc123; yourdle-pets-extra=zzz";
        assert_eq!(settings().read_token("pets", header), Some("abc123"));
        assert_eq!(settings().read_token("pets-extra", header), Some("zzz"));
        assert_eq!(settings().read_token("birds", header), None);
        assert_eq!(settings().read_token("pets", "yourdle-pets="), None);
        assert_eq!(settings().read_token("pets", ""), None);
    }

    #[test]
    fn set_cookie_scopes_to_slug_path() {
        assert_eq!(
            settings().set_cookie("pets", "abc123"),
            "yourdle-pets=abc123; Max-Age=31536000; Path=/pets; SameSite=Lax; Secure"
        );
    }
}
