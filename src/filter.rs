use crate::config::ImageConfig;
use regex::Regex;

/// Decides which image sources are mirrored
#[derive(Debug)]
pub struct ImageFilter {
    host_marker: String,
    exclude_regexes: Vec<Regex>,
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new(&ImageConfig::default()).expect("Default image config has no patterns")
    }
}

impl ImageFilter {
    /// Create a new image filter from configuration
    pub fn new(config: &ImageConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            host_marker: config.host_marker.clone(),
            exclude_regexes,
        })
    }

    /// Whether an image `src` should be kept
    pub fn should_keep(&self, src: &str) -> bool {
        // Plain substring match, not a prefix or host comparison
        if !src.contains(&self.host_marker) {
            return false;
        }

        !self.exclude_regexes.iter().any(|regex| regex.is_match(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = ImageFilter::default();

        assert!(filter.should_keep("https://addons.prestashop.com/img/cover.png"));
        assert!(!filter.should_keep("https://cdn.example.com/img/cover.png"));
        assert!(!filter.should_keep("/img/relative.png"));
    }

    #[test]
    fn test_marker_matches_anywhere_in_src() {
        let filter = ImageFilter::default();
        assert!(filter.should_keep("https://proxy.example.com/?u=https://addons.prestashop.com/a.png"));
    }

    #[test]
    fn test_exclude_patterns() {
        let config = ImageConfig {
            host_marker: "https://addons.prestashop.com/".to_string(),
            exclude_patterns: vec![r"/logo/".to_string(), r"\.svg$".to_string()],
        };
        let filter = ImageFilter::new(&config).unwrap();

        assert!(filter.should_keep("https://addons.prestashop.com/img/shot.jpg"));
        assert!(!filter.should_keep("https://addons.prestashop.com/logo/brand.png"));
        assert!(!filter.should_keep("https://addons.prestashop.com/img/icon.svg"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ImageConfig {
            host_marker: "x".to_string(),
            exclude_patterns: vec!["(".to_string()],
        };
        assert!(ImageFilter::new(&config).is_err());
    }
}
