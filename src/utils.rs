use url::Url;

/// File name used when registering a downloaded image
pub fn image_file_name(image_url: &str) -> String {
    let from_url = Url::parse(image_url).ok().and_then(|url| {
        url.path_segments()
            .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
    });

    let name = from_url
        .or_else(|| image_url.rsplit('/').next().map(|s| s.to_string()))
        .unwrap_or_default();

    if name.is_empty() {
        "default.jpg".to_string()
    } else {
        sanitize_filename(&name)
    }
}

/// Replace characters that are invalid in file names
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', ':', '?', '&', '=', '#', '%'], "_");

    // Limit filename length
    if name.len() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}

/// Escape a value for use inside an HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name() {
        assert_eq!(
            image_file_name("https://addons.prestashop.com/img/cover-1.jpg?v=2"),
            "cover-1.jpg"
        );
        assert_eq!(image_file_name("https://addons.prestashop.com/"), "default.jpg");
        assert_eq!(image_file_name("not a url/shot.png"), "shot.png");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a:b?c.png"), "a_b_c.png");
        assert_eq!(sanitize_filename(&"x".repeat(150)).len(), 100);
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("42"), "42");
        assert_eq!(escape_attr("\"><script>"), "&quot;&gt;&lt;script&gt;");
        assert_eq!(escape_attr("a&b'c"), "a&amp;b&#039;c");
    }
}
