// src/utils/html.rs

/// Strips markup that could execute in the browser from user-supplied text
/// (feedback, announcement bodies) before it is stored.
///
/// Whitelist based: formatting tags such as <b> or <p> survive, <script>
/// elements are removed together with their content, and event-handler
/// attributes are dropped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
