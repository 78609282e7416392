//! # 페이지네이션(Pagination) 모듈
//!
//! 정렬된 대용량 목록을 "페이지" 단위 창(window)으로 잘라서 보여주기 위한 모듈입니다.
//! 전체 결과를 다 읽지 않고, 한 페이지 분량 + 전체 개수만 질의하는 것이 핵심입니다.
//!
//! 이 모듈의 구성:
//! - `PAGE_SIZE`: 시스템 전역에서 쓰는 한 페이지의 크기 (상수)
//! - `clamp_page()` / `page_offset()`: 페이지 번호 → OFFSET 계산 유틸리티
//! - `Paginator<T>`: 한 페이지의 결과와 전체 개수 메타데이터를 담는 구조체
//!
//! 쿼리를 직접 실행하지는 않습니다. db 계층이 (같은 WHERE 조건으로) COUNT 쿼리와
//! 페이지 쿼리를 실행한 뒤, 그 결과를 이 구조체에 담아 돌려줍니다.
//! 조건이 갈라지면 "전체 37건"과 실제 페이지 내용이 어긋나기 때문에,
//! 두 쿼리는 반드시 동일한 필터를 공유해야 합니다.

/// 한 페이지에 담는 글의 수. 시스템 전체에서 이 상수 하나만 사용합니다.
pub const PAGE_SIZE: i64 = 10;

/// 페이지 번호를 1 이상으로 보정합니다.
///
/// 0이나 음수를 요청해도 에러가 아니라 1페이지로 취급합니다.
/// max(): 두 값 중 큰 쪽을 반환 — 여기서는 "최소 1"을 보장하는 용도입니다.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// 페이지 번호와 페이지 크기로 SQL OFFSET을 계산합니다.
///
/// 1페이지 → 0, 2페이지 → page_size, 3페이지 → page_size * 2, ...
/// 페이지 번호는 내부에서 한 번 더 보정하므로 음수가 와도 안전합니다.
///
/// 페이지 번호는 쿼리 문자열에서 그대로 들어오므로 i64 상한 근처의 값도
/// 올 수 있습니다. saturating_* 연산은 넘치는 결과를 i64::MAX에 멈춰 세우므로,
/// 음수 OFFSET으로 감겨 1페이지 내용이 다시 나오는 일이 없습니다.
/// (OFFSET i64::MAX는 어떤 실제 행 수보다 커서 그냥 빈 페이지입니다.)
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    clamp_page(page).saturating_sub(1).saturating_mul(page_size)
}

/// 한 페이지의 결과 + 전체 개수 메타데이터
///
/// 제네릭 `<T>`: 담는 항목의 타입을 호출하는 쪽이 정합니다.
/// 글 목록이면 `Paginator<ArticleListItem>`처럼 사용합니다.
/// 페이지 수, 이전/다음 페이지 번호 등은 저장하지 않고 그때그때 계산합니다.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    /// 현재 페이지에 실린 결과 (길이 ≤ page_size)
    results: Vec<T>,
    /// 현재 페이지 번호 (1부터 시작, 보정 완료된 값)
    current_page: i64,
    /// 한 페이지의 크기
    page_size: i64,
    /// 필터를 통과한 전체 행 수 (이 페이지가 아니라 전체!)
    num_results: i64,
}

impl<T> Paginator<T> {
    /// 이미 조회된 한 페이지 결과와 전체 개수로 Paginator를 만듭니다.
    ///
    /// page는 여기서도 보정하므로, 호출하는 쪽이 깜빡해도 메타데이터는 어긋나지 않습니다.
    pub fn new(results: Vec<T>, page: i64, page_size: i64, num_results: i64) -> Self {
        Self {
            results,
            current_page: clamp_page(page),
            page_size,
            num_results,
        }
    }

    /// 현재 페이지 번호 (1부터 시작)
    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    /// 한 페이지의 크기
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// 필터를 통과한 전체 행 수
    pub fn num_results(&self) -> i64 {
        self.num_results
    }

    /// 마지막 페이지 번호 = ceil(전체 수 / 페이지 크기)
    ///
    /// 정수 나눗셈으로 올림을 구하는 관용 표현입니다: (a + b - 1) / b
    /// 결과가 하나도 없으면 0입니다 (1이 아님에 주의).
    pub fn last_page(&self) -> i64 {
        (self.num_results + self.page_size - 1) / self.page_size
    }

    /// 이전 페이지가 있는가? (1페이지가 아니면 항상 참)
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// 이전 페이지 번호. 1페이지에서는 1에 머뭅니다.
    pub fn previous_page(&self) -> i64 {
        (self.current_page - 1).max(1)
    }

    /// 다음 페이지가 있는가?
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// 다음 페이지 번호. 마지막 페이지를 넘지 않습니다.
    /// current_page는 요청에서 온 값이므로 +1도 포화 연산으로 계산합니다.
    pub fn next_page(&self) -> i64 {
        self.current_page.saturating_add(1).min(self.last_page())
    }

    /// 페이지를 나눌 필요가 있는가? (전체가 한 페이지에 다 들어가면 거짓)
    pub fn has_to_paginate(&self) -> bool {
        self.num_results > self.page_size
    }

    /// 현재 페이지의 결과를 빌려옵니다.
    /// &[T]: 슬라이스 — Vec의 내용을 소유권 이동 없이 읽기 전용으로 봅니다.
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Paginator를 소비(consume)하고 결과 Vec의 소유권을 꺼냅니다.
    /// self를 참조(&self)가 아니라 값으로 받는 것에 주목하세요.
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}
