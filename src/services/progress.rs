//! # 과제 기간(Assignment Window)과 진도 계산
//!
//! 루틴이 배정된 날부터 8일(배정일 포함, `[배정일, 배정일 + 7]`) 동안만
//! 연습 기록을 남길 수 있습니다. 이 모듈은 그 기간 계산과
//! 진도율(0~100%), 차트용 일별 데이터 생성을 담당합니다.
//!
//! 모든 함수는 순수 함수입니다. 계산 결과를 학생 레코드에 저장하는 일은
//! `db::students::record_progress`가 따로 맡습니다.
//!
//! ## 진도율 공식
//! ```text
//! ideal   = 학생에게 저장된 주간 이상 시간 (> 0)
//!           없으면 템플릿의 주간 이상 시간, 그것도 0이면 진도율 0
//! total   = 기간 안 기록들의 연습 시간 합
//! percent = min(100, round(100 × total / ideal))
//! ```

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{DailyPracticeLog, RoutineTemplate, StudentData};

/// 과제 기간의 길이 (일)
pub const WINDOW_DAYS: u64 = 8;

/// 서버 로컬 시간대 기준의 오늘. 날짜를 생략한 요청의 기본값입니다.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// ISO 8601 날짜 문자열을 날짜로 해석합니다.
///
/// `2024-01-01`, `2024-01-01T09:30:00.000Z`, `2024-01-01T09:30:00` 모두 받습니다.
/// 해석할 수 없으면 None: 호출자는 해당 값을 계산에서 제외합니다.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// 8일짜리 과제 기간 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AssignmentWindow {
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Days::new(WINDOW_DAYS - 1),
        }
    }

    /// 학생 레코드에 저장된 배정일 문자열로부터 기간을 만듭니다.
    /// 배정일이 없거나 깨져 있으면 None (= 어떤 날짜도 기록 불가).
    pub fn from_assignment_date(raw: Option<&str>) -> Option<Self> {
        raw.and_then(parse_iso_date).map(Self::starting)
    }

    pub fn for_student(student: &StudentData) -> Option<Self> {
        Self::from_assignment_date(student.current_routine_assignment_date.as_deref())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 기간에 속한 8개의 날짜를 순서대로 돌려줍니다.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..WINDOW_DAYS).map(move |offset| start + Days::new(offset))
    }

    /// 사용자에게 보여줄 기간 안내 문구
    pub fn describe(&self) -> String {
        format!(
            "Practice can only be logged between {} and {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// 해당 날짜에 기록을 남길 수 있는지 여부
pub fn is_loggable(window: Option<&AssignmentWindow>, date: NaiveDate) -> bool {
    window.is_some_and(|w| w.contains(date))
}

/// 이전/다음 날 이동 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// 하루 이동합니다. 이동한 날짜가 기간 밖이면 이동하지 않고 원래 날짜를 돌려줍니다.
///
/// 기간 경계로 끌어당기지(clamp) 않습니다.
/// 기간이 없으면 제한 없이 이동합니다.
pub fn navigate(window: Option<&AssignmentWindow>, current: NaiveDate, direction: Direction) -> NaiveDate {
    let target = match direction {
        Direction::Prev => current.checked_sub_days(Days::new(1)),
        Direction::Next => current.checked_add_days(Days::new(1)),
    };
    let Some(target) = target else {
        return current;
    };

    match (window, direction) {
        (Some(w), Direction::Prev) if target < w.start => current,
        (Some(w), Direction::Next) if target > w.end => current,
        _ => target,
    }
}

/// (이전 버튼 활성화, 다음 버튼 활성화)
pub fn navigation_flags(window: Option<&AssignmentWindow>, current: NaiveDate) -> (bool, bool) {
    match window {
        Some(w) => (current > w.start, current < w.end),
        None => (true, true),
    }
}

/// 학생의 현재 루틴, 현재 기간에 해당하는 기록만 골라냅니다.
///
/// 날짜를 해석할 수 없는 기록은 조용히 제외합니다.
pub fn relevant_logs<'a>(
    logs: &'a [DailyPracticeLog],
    student_id: &str,
    routine_id: &str,
    window: &AssignmentWindow,
) -> Vec<&'a DailyPracticeLog> {
    logs.iter()
        .filter(|log| log.student_id == student_id)
        .filter(|log| log.routine_template_id.as_deref() == Some(routine_id))
        .filter(|log| parse_iso_date(&log.date).is_some_and(|d| window.contains(d)))
        .collect()
}

/// 진도 계산에 쓸 주간 이상 연습 시간을 정합니다.
///
/// 학생 레코드 값 → 템플릿에 저장된 값 → 템플릿 섹션으로 다시 계산한 값 순서.
pub fn resolve_ideal_weekly_time(student_ideal: Option<u32>, template: Option<&RoutineTemplate>) -> u32 {
    if let Some(ideal) = student_ideal.filter(|v| *v > 0) {
        return ideal;
    }
    template
        .map(|t| {
            t.calculated_ideal_weekly_time
                .filter(|v| *v > 0)
                .unwrap_or_else(|| t.ideal_weekly_minutes())
        })
        .unwrap_or(0)
}

/// `min(100, round(100 × total / ideal))`, ideal이 0이면 나누지 않고 0.
pub fn progress_percent(total_minutes: u32, ideal_weekly_time: u32) -> u32 {
    if ideal_weekly_time == 0 {
        return 0;
    }
    let ratio = f64::from(total_minutes) / f64::from(ideal_weekly_time) * 100.0;
    (ratio.round() as u32).min(100)
}

/// 진도 계산 결과: 학생 레코드에 그대로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOutcome {
    pub ideal_weekly_time: u32,
    pub total_minutes: u32,
    pub percent: u32,
}

/// 학생의 현재 루틴 진도를 계산합니다 (저장하지 않음).
///
/// 배정된 루틴이나 배정일이 없으면 계산할 것이 없으므로 None.
pub fn compute_progress(
    student: &StudentData,
    template: Option<&RoutineTemplate>,
    logs: &[DailyPracticeLog],
) -> Option<ProgressOutcome> {
    let routine_id = student.current_routine_id.as_deref()?;
    let window = AssignmentWindow::for_student(student)?;

    let ideal_weekly_time = resolve_ideal_weekly_time(student.current_routine_ideal_weekly_time, template);
    if ideal_weekly_time == 0 {
        return Some(ProgressOutcome {
            ideal_weekly_time: 0,
            total_minutes: 0,
            percent: 0,
        });
    }

    let total_minutes = relevant_logs(logs, &student.id, routine_id, &window)
        .iter()
        .map(|log| log.total_minutes())
        .fold(0u32, u32::saturating_add);

    Some(ProgressOutcome {
        ideal_weekly_time,
        total_minutes,
        percent: progress_percent(total_minutes, ideal_weekly_time),
    })
}

/// 막대 차트의 하루치 데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    /// 축 라벨 (예: "Mon, Jan 1")
    pub label: String,
    pub actual_practice: u32,
    pub ideal_daily_practice: u32,
}

/// 기간 8일 각각에 대해 (실제 연습 시간, 하루 이상 연습 시간)을 만듭니다.
///
/// `logs`는 `relevant_logs`로 걸러진 기록이어야 합니다.
/// 기록이 없는 날은 0분입니다.
pub fn chart_series(
    window: &AssignmentWindow,
    logs: &[&DailyPracticeLog],
    ideal_daily_minutes: u32,
) -> Vec<ChartPoint> {
    window
        .days()
        .map(|day| {
            let key = day.format("%Y-%m-%d").to_string();
            let actual = logs
                .iter()
                .find(|log| log.date == key)
                .map(|log| log.total_minutes())
                .unwrap_or(0);
            ChartPoint {
                label: day.format("%a, %b %-d").to_string(),
                date: key,
                actual_practice: actual,
                ideal_daily_practice: ideal_daily_minutes,
            }
        })
        .collect()
}
