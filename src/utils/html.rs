// src/utils/html.rs

use crate::models::question::CreateQuestionRequest;

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe formatting tags (<b>, <p>, <sub>) survive, while
/// <script>, <iframe> and event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes the authored question and option text in place.
///
/// Question text is rich text rendered in student browsers.
pub fn sanitize_question(req: &mut CreateQuestionRequest) {
    req.text = clean_html(&req.text);
    for option in &mut req.options {
        option.text = clean_html(&option.text);
    }
}
