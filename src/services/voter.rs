//! # 접근 정책(Voter) 모듈
//!
//! "이 행위자(actor)가 이 글(article)에 이 작업(action)을 해도 되는가?"에
//! 답하는 순수 함수입니다. 상태를 읽거나 바꾸지 않으므로
//! 모든 요청에서 몇 번이든 안전하게 호출할 수 있습니다.
//!
//! 결정은 3가지입니다:
//! - `Granted`: 허용
//! - `Denied`: 거부
//! - `Abstain`: 이 정책이 판단할 수 없는 조합 — "거부"와 구분됩니다.
//!   호출하는 쪽은 Abstain을 받으면 다른 정책에 넘기거나,
//!   아무 정책도 답하지 않았으므로 기본 거부로 처리합니다.
//!
//! 행위자는 항상 명시적 매개변수로 전달됩니다. 전역 상태나 요청 컨텍스트에서
//! "현재 사용자"를 몰래 읽어오지 않습니다 — 그래서 테스트가 쉽습니다.

use crate::models::{Article, User};

/// 글에 대해 요청할 수 있는 작업
///
/// 문자열 상수 대신 열거형을 쓰면 오타가 컴파일 에러가 되고,
/// 변형(variant)이 추가될 때 컴파일러가 빠뜨린 match를 전부 짚어줍니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleAction {
    /// 글 상세 보기
    Show,
    /// 글 수정
    Edit,
    /// 글 삭제
    Delete,
}

/// 정책의 투표 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied,
    /// 이 정책의 관할이 아님 (거부가 아니라 "모름")
    Abstain,
}

/// 이 정책이 해당 작업을 판단할 수 있는지 확인합니다.
///
/// 현재는 세 작업 모두 판단합니다. 와일드카드(`_`) 없이 모든 변형을
/// 나열하는 이유: 나중에 ArticleAction에 변형이 추가되면 이 match가
/// 컴파일 에러를 내서, 새 작업을 지원할지 여기서 결정하게 만듭니다.
fn supports(action: ArticleAction) -> bool {
    match action {
        ArticleAction::Show | ArticleAction::Edit | ArticleAction::Delete => true,
    }
}

/// (행위자, 작업, 글)에 대해 투표합니다.
///
/// # 규칙 (현재 단 하나)
/// 1. 판단할 수 없는 작업이면 `Abstain`
/// 2. 행위자가 익명(None)이면 `Denied`
/// 3. 행위자가 글의 작성자이거나 EDITOR 역할을 가지면 `Granted`
/// 4. 그 외에는 `Denied`
///
/// 세 작업(Show/Edit/Delete)이 전부 같은 규칙을 공유합니다.
/// 작업별로 규칙을 나누고 싶어지면 3단계의 match를 action으로 나누면 되고,
/// 호출하는 쪽의 코드는 바뀌지 않습니다.
pub fn vote(actor: Option<&User>, action: ArticleAction, article: &Article) -> Decision {
    if !supports(action) {
        return Decision::Abstain;
    }

    // let-else: Option이 None이면 else 블록으로 빠집니다.
    // "로그인하지 않았으면 거부"를 이보다 짧게 쓰기는 어렵습니다.
    let Some(user) = actor else {
        return Decision::Denied;
    };

    if user.id == article.author_id || user.is_editor() {
        Decision::Granted
    } else {
        Decision::Denied
    }
}
