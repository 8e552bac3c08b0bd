//! Classification policy. Single source of truth for the local keyword
//! classifier and the prompt sent to the remote model.
//!
//! Keyword entries are regex fragments (Korean and English mixed) joined into
//! one case-insensitive alternation per set. Matching is by substring, so a
//! short entry like `ui` also fires inside `build`.

use crate::{Bucket, Locale};

/// Entertainment that goes straight to Optional, before any scoring.
pub const STRONG_ENTERTAINMENT: &[&str] = &[
    "게임", "game", "넷플릭스", "netflix", "드라마", "쇼", "시청", "유튜브", "youtube",
];

/// Work directly tied to today's output.
pub const CORE_HARD: &[&str] = &[
    "발표", "프레젠테이션", "presentation", "demo", "데모", r"회의\s*자료", r"자료\s*완성",
    r"회의\s*준비", "report", "리포트", "보고서", "프로토타입", "prototype", "고객",
    r"이메일\s*답변", "reply", "respond", "deadline", "마감", "due", "출시", "release",
    "launch",
];

/// Planning chores that lean Core.
pub const CORE_SOFT: &[&str] = &[
    "주간", "weekly", "정리", "정돈", "정비", "정책", "plan", "기획", "스펙", "spec",
];

pub const GROWTH: &[&str] = &[
    "blog", "블로그", "seo", "콘텐츠", "article", "post", "문서화", "docs", "리팩터",
    "refactor", "가독성", "readability", "ux", "ui", "레이아웃", "layout", "브랜딩",
    "branding", "roadmap", "학습", "study", "공부", "learning", "course", "tutorial",
    "practice", "알고리즘", "algorithm", "튜닝", "tuning", "성능", "performance", "운동",
    "런닝", "헬스", "exercise", "독서", "책", "reading",
];

/// Broader than [`STRONG_ENTERTAINMENT`]: hobbies, experiments, "maybe later".
pub const OPTIONAL: &[&str] = &[
    "게임", "game", "넷플릭스", "netflix", "드라마", "쇼", "시청", "유튜브", "youtube",
    "취미", "여가", "experiment", "실험", "아이디어", "brainstorm", "브레인스토밍", "polish",
    "animation", r"three\.js", "fun", "maybe", "later", "someday",
];

pub const CORE_HARD_SCORE: u32 = 3;
pub const CORE_SOFT_SCORE: u32 = 1;
pub const GROWTH_SCORE: u32 = 2;
pub const OPTIONAL_SCORE: u32 = 1;

/// Bucket for lines nothing claims.
pub const DEFAULT_BUCKET: Bucket = Bucket::Growth;

/// Case-insensitive alternation over a keyword set.
pub fn alternation(keywords: &[&str]) -> String {
    format!("(?i){}", keywords.join("|"))
}

/// A task line with its expected bucket, in both languages.
#[derive(Debug, Clone, Copy)]
pub struct WorkedExample {
    pub ko: &'static str,
    pub en: &'static str,
    pub bucket: Bucket,
}

impl WorkedExample {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ko => self.ko,
            Locale::En => self.en,
        }
    }
}

pub const WORKED_EXAMPLES: &[WorkedExample] = &[
    WorkedExample { ko: "팀 회의 발표 자료 완성", en: "Finish team presentation deck", bucket: Bucket::Core },
    WorkedExample { ko: "고객 이메일 답변 보내기", en: "Reply to customer email", bucket: Bucket::Core },
    WorkedExample { ko: "신규 기능 프로토타입 만들기", en: "Build new feature prototype", bucket: Bucket::Core },
    WorkedExample { ko: "주간 리포트 작성", en: "Write weekly report", bucket: Bucket::Core },
    WorkedExample { ko: "블로그 글 작성", en: "Write technical blog post", bucket: Bucket::Growth },
    WorkedExample { ko: "UI 디자인 패턴 공부하기", en: "Study UI design patterns", bucket: Bucket::Growth },
    WorkedExample { ko: "데이터베이스 성능 튜닝 연습", en: "DB performance tuning practice", bucket: Bucket::Growth },
    WorkedExample { ko: "운동 30분", en: "Exercise 30m", bucket: Bucket::Growth },
    WorkedExample { ko: "책 읽기", en: "Read book", bucket: Bucket::Growth },
    WorkedExample { ko: "알고리즘 풀기", en: "Solve algorithms", bucket: Bucket::Growth },
    WorkedExample { ko: "게임하기 1시간", en: "Play games 1h", bucket: Bucket::Optional },
    WorkedExample { ko: "넷플릭스 드라마 보기", en: "Watch Netflix", bucket: Bucket::Optional },
    WorkedExample { ko: "새로운 앱 아이디어 브레인스토밍", en: "Brainstorm new app idea", bucket: Bucket::Optional },
    WorkedExample { ko: "사진 보정 실험", en: "Photo retouching experiment", bucket: Bucket::Optional },
];

/// Human-readable rubric, one variant per locale.
#[derive(Debug)]
pub struct Rubric {
    pub role: &'static str,
    pub criteria_heading: &'static str,
    pub core: &'static str,
    pub growth: &'static str,
    pub optional: &'static str,
    pub examples_heading: &'static str,
    pub rules_heading: &'static str,
    pub rules: &'static [&'static str],
    pub request: &'static str,
}

impl Rubric {
    pub fn criterion(&self, bucket: Bucket) -> &'static str {
        match bucket {
            Bucket::Core => self.core,
            Bucket::Growth => self.growth,
            Bucket::Optional => self.optional,
        }
    }
}

const RUBRIC_KO: Rubric = Rubric {
    role: "당신은 할일 우선순위 전문가입니다. 아래 기준으로만 분류하세요.",
    criteria_heading: "분류 기준",
    core: "Core(핵심): 발표/데모/프로토타입/리포트/고객 대응/마감·출시 등 당장 업무 성과와 직결되는 일",
    growth: "Growth(성장): 학습/문서화/리팩터/SEO/브랜딩/운동/독서/알고리즘 등 장기 가치를 높이는 일",
    optional: "Optional(선택): 게임/넷플릭스/유튜브 등 엔터테인먼트, 브레인스토밍·실험적 아이디어",
    examples_heading: "예시",
    rules_heading: "규칙",
    rules: &[
        "엔터테인먼트는 항상 Optional.",
        "발표/프로토타입/리포트/고객 대응은 기본 Core.",
        "애매하면 Growth.",
        "JSON만 반환. 여분 텍스트 금지.",
    ],
    request: "다음 작업들을 위 기준으로 분류하세요:",
};

const RUBRIC_EN: Rubric = Rubric {
    role: "You are a prioritization expert. Classify strictly by:",
    criteria_heading: "Criteria",
    core: "Core: presentations/demos/prototypes/reports/customer responses/deadlines/launches",
    growth: "Growth: learning/docs/refactor/SEO/branding/exercise/reading/algorithms",
    optional: "Optional: entertainment (games/Netflix/YouTube), brainstorming/experimental ideas",
    examples_heading: "Examples",
    rules_heading: "Rules",
    rules: &[
        "Entertainment is always Optional.",
        "Presentation/prototype/report/customer response default to Core.",
        "If uncertain, choose Growth.",
        "Return JSON only, nothing else.",
    ],
    request: "Classify these tasks by the rules:",
};

pub fn rubric(locale: Locale) -> &'static Rubric {
    match locale {
        Locale::Ko => &RUBRIC_KO,
        Locale::En => &RUBRIC_EN,
    }
}

/// Reply shape the remote model is asked to produce.
pub const RESPONSE_SHAPE: &str = r#"{"core":[],"growth":[],"optional":[],"dailyFocus":[{"priority":1,"task":""},{"priority":2,"task":""},{"priority":3,"task":""}]}"#;
