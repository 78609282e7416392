//! # 글 검증(Validation) 모듈
//!
//! 글이 저장되기 전에 통과해야 하는 필드별 규칙들입니다.
//! 첫 위반에서 멈추지 않고 모든 위반을 모아 한 번에 반환하므로,
//! 클라이언트는 요청 한 번으로 고칠 것 전부를 알 수 있습니다.
//!
//! 이 모듈은 순수 함수만 담습니다 — DB를 건드리지 않으므로
//! 연결 풀 없이 단위 테스트할 수 있습니다.
//! (슬러그 중복처럼 DB가 필요한 확인은 서비스 계층이 담당합니다.)

use crate::error::Violation;

/// 요약(summary)의 최대 길이 (문자 수 기준, 바이트 아님)
pub const MAX_SUMMARY_CHARS: usize = 255;
/// 본문(content)의 최소 길이
pub const MIN_CONTENT_CHARS: usize = 10;
/// 글 하나에 붙일 수 있는 태그의 최대 개수
pub const MAX_TAGS: usize = 4;

// 요약에 들어가면 안 되는 낚시성(clickbait) 단어들.
// 부분 문자열 일치로 검사합니다: "top"이 들어 있으므로
// "stop"이 포함된 요약도 걸립니다. 보수적으로 거르는 것이 의도입니다.
const CLICKBAIT_WORDS: [&str; 7] = [
    "unbelievable",
    "shocking",
    "you won't believe",
    "secret",
    "top",
    "amazing",
    "incredible",
];

// 웹 링크로 간주하는 접두 패턴들 (대소문자 무시)
const LINK_PATTERNS: [&str; 3] = ["http://", "https://", "www."];

/// 텍스트에 웹 링크나 낚시성 단어가 들어 있는지 검사합니다.
///
/// 대소문자를 무시하기 위해 전체를 소문자로 한 번 변환한 뒤,
/// 패턴/단어 목록과 부분 문자열 비교만 합니다. 정규식이 필요 없는 수준입니다.
pub fn contains_link_or_clickbait(text: &str) -> bool {
    let lowered = text.to_lowercase();
    LINK_PATTERNS.iter().any(|pattern| lowered.contains(pattern))
        || CLICKBAIT_WORDS.iter().any(|word| lowered.contains(word))
}

/// "비어 있음"의 정의: 공백만 있어도 비어 있는 것으로 봅니다.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 제목 규칙: 비어 있으면 안 됩니다.
pub fn validate_title(title: &str) -> Vec<Violation> {
    if is_blank(title) {
        return vec![Violation::new("title", "The title cannot be blank.")];
    }
    Vec::new()
}

/// 요약 규칙: 비어 있으면 안 되고, 255자 이하이며, 링크/낚시 단어 금지.
///
/// 비어 있으면 길이/낚시 검사는 건너뜁니다 — "비어 있음" 하나로 충분하고,
/// 빈 문자열에 대한 나머지 위반은 소음일 뿐입니다.
/// 길이 초과와 낚시 단어는 동시에 보고될 수 있습니다.
pub fn validate_summary(summary: &str) -> Vec<Violation> {
    if is_blank(summary) {
        return vec![Violation::new("summary", "The summary cannot be blank.")];
    }

    let mut violations = Vec::new();
    // .chars().count(): 유니코드 문자 수. .len()은 바이트 수라 한글에 부적합합니다.
    if summary.chars().count() > MAX_SUMMARY_CHARS {
        violations.push(Violation::new(
            "summary",
            &format!(
                "The summary cannot be longer than {} characters.",
                MAX_SUMMARY_CHARS
            ),
        ));
    }
    if contains_link_or_clickbait(summary) {
        violations.push(Violation::new(
            "summary",
            "The summary cannot contain web links or clickbait words.",
        ));
    }
    violations
}

/// 본문 규칙: 비어 있으면 안 되고, 최소 10자.
pub fn validate_content(content: &str) -> Vec<Violation> {
    if is_blank(content) {
        return vec![Violation::new("content", "The content cannot be blank.")];
    }
    if content.chars().count() < MIN_CONTENT_CHARS {
        return vec![Violation::new(
            "content",
            &format!(
                "The content is too short ({} characters minimum).",
                MIN_CONTENT_CHARS
            ),
        )];
    }
    Vec::new()
}

/// 태그 규칙: 최대 4개.
///
/// 개수만 봅니다 — 이 함수에 오기 전에 서비스 계층이
/// 이름 정리(공백 제거, 빈 이름 제외, 중복 제거)를 끝냈다고 가정합니다.
pub fn validate_tags(tags: &[String]) -> Vec<Violation> {
    if tags.len() > MAX_TAGS {
        return vec![Violation::new(
            "tags",
            &format!("Too many tags ({} maximum).", MAX_TAGS),
        )];
    }
    Vec::new()
}

/// 필드별 검사를 전부 실행해 위반 목록 하나로 합칩니다.
///
/// 빈 Vec이 반환되면 통과입니다. 호출하는 쪽(서비스 계층)은
/// 여기에 슬러그 중복 같은 DB 확인 결과를 더 얹을 수 있습니다.
pub fn validate_article(
    title: &str,
    summary: &str,
    content: &str,
    tags: &[String],
) -> Vec<Violation> {
    let mut violations = validate_title(title);
    violations.extend(validate_summary(summary));
    violations.extend(validate_content(content));
    violations.extend(validate_tags(tags));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_valid_article_has_no_violations() {
        let violations = validate_article(
            "A perfectly fine title",
            "This is totally normal news",
            "Content that is clearly long enough.",
            &tag_names(&["rust", "web"]),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_blank_fields_are_each_reported() {
        let violations = validate_article("", "   ", "", &[]);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "summary", "content"]);
    }

    #[test]
    fn test_summary_with_link_fails() {
        let violations = validate_summary("Check out http://example.com now!");
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "The summary cannot contain web links or clickbait words."
        );
    }

    #[test]
    fn test_link_detection_is_case_insensitive() {
        assert!(contains_link_or_clickbait("visit HTTPS://example.com"));
        assert!(contains_link_or_clickbait("visit WWW.example.com"));
        assert!(contains_link_or_clickbait("SHOCKING developments today"));
    }

    #[test]
    fn test_multiword_clickbait_phrase() {
        assert!(contains_link_or_clickbait("You won't believe what happened"));
    }

    #[test]
    fn test_clickbait_matches_substrings() {
        // "stop"은 "top"을 포함하므로 걸립니다 — 부분 문자열 일치는 의도된 동작입니다.
        assert!(contains_link_or_clickbait("Stop the presses"));
        assert!(!contains_link_or_clickbait("This is totally normal news"));
    }

    #[test]
    fn test_summary_length_boundary() {
        // 255자는 통과, 256자는 위반
        let at_limit = "a".repeat(255);
        assert!(validate_summary(&at_limit).is_empty());

        let over_limit = "a".repeat(256);
        let violations = validate_summary(&over_limit);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("255"));
    }

    #[test]
    fn test_summary_length_counts_chars_not_bytes() {
        // 한글 255자는 바이트로는 765이지만 문자 수로는 255 — 통과해야 합니다.
        let korean = "글".repeat(255);
        assert!(validate_summary(&korean).is_empty());
    }

    #[test]
    fn test_long_summary_with_clickbait_reports_both() {
        let summary = format!("{} amazing", "a".repeat(256));
        let violations = validate_summary(&summary);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_content_minimum_length() {
        // 정확히 10자는 통과
        assert!(validate_content("1234567890").is_empty());
        // 9자는 위반
        let violations = validate_content("123456789");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "content");
    }

    #[test]
    fn test_blank_content_reports_blank_not_short() {
        let violations = validate_content("   ");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "The content cannot be blank.");
    }

    #[test]
    fn test_five_tags_fail_four_pass() {
        let four = tag_names(&["a", "b", "c", "d"]);
        assert!(validate_tags(&four).is_empty());

        let five = tag_names(&["a", "b", "c", "d", "e"]);
        let violations = validate_tags(&five);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "tags");
    }
}
