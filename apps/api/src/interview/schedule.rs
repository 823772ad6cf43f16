use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::interview::error::InterviewError;
use crate::interview::models::{ActorModel, InterviewProcess, InterviewStage, StageStatus};
use crate::interview::tracker::StageUpdate;
use crate::interview::transitions::validate_transition;
use crate::models::document::has_text;

/// Scheduling details for one stage. Absent fields leave the stage as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleRequest {
    pub scheduled_date: Option<NaiveDate>,
    /// `HH:MM` or `h:mm AM/PM`.
    pub scheduled_time: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub meeting_link: Option<String>,
    pub instructions: Option<String>,
}

/// Normalizes a clock time to 24-hour `HH:MM`.
pub fn normalize_time_format(input: &str) -> Result<String, InterviewError> {
    let trimmed = input.trim();
    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return Ok(time.format("%H:%M").to_string());
    }

    // "2:30 PM", "02:30pm"
    let upper = trimmed.to_ascii_uppercase();
    let spaced = match upper.strip_suffix("AM").or_else(|| upper.strip_suffix("PM")) {
        Some(clock) => format!("{} {}", clock.trim_end(), &upper[upper.len() - 2..]),
        None => return Err(InterviewError::InvalidTime(input.to_string())),
    };
    NaiveTime::parse_from_str(&spaced, "%I:%M %p")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| InterviewError::InvalidTime(input.to_string()))
}

/// `HH:MM` to `h:mm AM`. Unparsable input is returned trimmed.
pub fn format_time_am_pm(time: &str) -> String {
    match NaiveTime::parse_from_str(time.trim(), "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => time.trim().to_string(),
    }
}

/// Normalizes `scheduled_time` on every stage of an incoming stage list.
pub fn normalize_stage_times(stages: &mut [InterviewStage]) -> Result<(), InterviewError> {
    for stage in stages.iter_mut() {
        stage.scheduled_time = match stage.scheduled_time.take() {
            Some(t) if has_text(Some(t.as_str())) => Some(normalize_time_format(&t)?),
            _ => None,
        };
    }
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn confirmation_message(stage: &InterviewStage) -> String {
    let label = stage
        .stage_type
        .round_label()
        .map(str::to_string)
        .or_else(|| Some(stage.stage_name.clone()).filter(|n| has_text(Some(n.as_str()))))
        .unwrap_or_else(|| "Interview round".to_string());

    let mut message = format!("{label} scheduled Successfully!!");
    match (stage.from_date, stage.to_date, stage.scheduled_date) {
        (Some(from), Some(to), _) => {
            message.push_str(&format!(
                " From: {} | To: {}",
                format_date(from),
                format_date(to)
            ));
        }
        (_, _, Some(date)) => message.push_str(&format!(" Date: {}", format_date(date))),
        _ => {}
    }
    if let Some(time) = stage.scheduled_time.as_deref() {
        message.push_str(&format!(" | Time: {}", format_time_am_pm(time)));
    }
    message
}

fn set_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| has_text(Some(v.as_str()))) {
        *slot = Some(value);
    }
}

impl InterviewProcess {
    /// Applies scheduling details to a stage, moves it to `scheduled` and
    /// returns the confirmation message shown to the employer.
    pub fn schedule_stage(
        &mut self,
        stage_index: usize,
        request: ScheduleRequest,
        changed_by: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<String, InterviewError> {
        let scheduled_time = request
            .scheduled_time
            .as_deref()
            .filter(|t| has_text(Some(*t)))
            .map(normalize_time_format)
            .transpose()?;

        let len = self.stages.len();
        let stage = self
            .stages
            .get(stage_index)
            .ok_or(InterviewError::InvalidStageIndex {
                index: stage_index,
                len,
            })?;
        validate_transition(stage.status, StageStatus::Scheduled)?;

        let stage = &mut self.stages[stage_index];
        if let Some(date) = request.scheduled_date {
            stage.scheduled_date = Some(date);
        }
        if let Some(time) = scheduled_time {
            stage.scheduled_time = Some(time);
        }
        if let Some(from) = request.from_date {
            stage.from_date = Some(from);
        }
        if let Some(to) = request.to_date {
            stage.to_date = Some(to);
        }
        set_text(&mut stage.location, request.location);
        set_text(&mut stage.interviewer_name, request.interviewer_name);
        set_text(&mut stage.interviewer_email, request.interviewer_email);
        set_text(&mut stage.meeting_link, request.meeting_link);
        set_text(&mut stage.instructions, request.instructions);

        self.update_stage_status(
            stage_index,
            StageUpdate {
                status: StageStatus::Scheduled,
                notes: None,
                changed_by,
                changed_by_model: ActorModel::Employer,
                changed_at: at,
            },
        )?;

        Ok(confirmation_message(&self.stages[stage_index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::StageType;
    use crate::interview::tracker::ProcessParties;
    use chrono::TimeZone;

    fn process() -> InterviewProcess {
        InterviewProcess::new(
            ProcessParties {
                application_id: Uuid::new_v4(),
                job_id: Uuid::new_v4(),
                candidate_id: Uuid::new_v4(),
                employer_id: Uuid::new_v4(),
            },
            vec![
                InterviewStage::new(StageType::Technical, "Technical Round", 1),
                InterviewStage::new(StageType::Custom, "Culture chat", 2),
            ],
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_time_format() {
        assert_eq!(normalize_time_format("14:30").unwrap(), "14:30");
        assert_eq!(normalize_time_format("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time_format("2:30 PM").unwrap(), "14:30");
        assert_eq!(normalize_time_format("02:30pm").unwrap(), "14:30");
        assert_eq!(normalize_time_format("12:15 AM").unwrap(), "00:15");
        assert_eq!(normalize_time_format("12:00 PM").unwrap(), "12:00");
        assert_eq!(
            normalize_time_format("25:00"),
            Err(InterviewError::InvalidTime("25:00".to_string()))
        );
        assert!(normalize_time_format("noon").is_err());
    }

    #[test]
    fn test_normalize_stage_times() {
        let mut stages = vec![
            InterviewStage::new(StageType::Hr, "HR", 1),
            InterviewStage::new(StageType::Final, "Final", 2),
            InterviewStage::new(StageType::Technical, "Tech", 3),
        ];
        stages[0].scheduled_time = Some("3:00 pm".to_string());
        stages[1].scheduled_time = Some("  ".to_string());
        normalize_stage_times(&mut stages).unwrap();
        assert_eq!(stages[0].scheduled_time.as_deref(), Some("15:00"));
        assert_eq!(stages[1].scheduled_time, None);
        assert_eq!(stages[2].scheduled_time, None);

        stages[2].scheduled_time = Some("later".to_string());
        assert!(normalize_stage_times(&mut stages).is_err());
    }

    #[test]
    fn test_format_time_am_pm() {
        assert_eq!(format_time_am_pm("14:30"), "2:30 PM");
        assert_eq!(format_time_am_pm("00:05"), "12:05 AM");
        assert_eq!(format_time_am_pm("09:00"), "9:00 AM");
        assert_eq!(format_time_am_pm("soon"), "soon");
    }

    #[test]
    fn test_schedule_with_date_range() {
        let mut p = process();
        let message = p
            .schedule_stage(
                0,
                ScheduleRequest {
                    from_date: Some(date(2024, 3, 5)),
                    to_date: Some(date(2024, 3, 7)),
                    scheduled_time: Some("2:30 PM".to_string()),
                    meeting_link: Some("https://meet.example/abc".to_string()),
                    ..Default::default()
                },
                None,
                now(),
            )
            .unwrap();

        assert_eq!(
            message,
            "Technical round scheduled Successfully!! From: 05/03/2024 | To: 07/03/2024 | Time: 2:30 PM"
        );
        let stage = &p.stages[0];
        assert_eq!(stage.status, StageStatus::Scheduled);
        assert_eq!(stage.scheduled_time.as_deref(), Some("14:30"));
        assert_eq!(stage.status_history.len(), 1);
    }

    #[test]
    fn test_custom_stage_uses_its_name() {
        let mut p = process();
        let message = p
            .schedule_stage(
                1,
                ScheduleRequest {
                    scheduled_date: Some(date(2024, 4, 1)),
                    ..Default::default()
                },
                None,
                now(),
            )
            .unwrap();
        assert_eq!(message, "Culture chat scheduled Successfully!! Date: 01/04/2024");
    }

    #[test]
    fn test_reschedule_keeps_earlier_details() {
        let mut p = process();
        p.schedule_stage(
            0,
            ScheduleRequest {
                location: Some("Pune office".to_string()),
                scheduled_date: Some(date(2024, 3, 5)),
                ..Default::default()
            },
            None,
            now(),
        )
        .unwrap();
        p.schedule_stage(
            0,
            ScheduleRequest {
                scheduled_date: Some(date(2024, 3, 6)),
                location: Some(" ".to_string()),
                ..Default::default()
            },
            None,
            now(),
        )
        .unwrap();

        let stage = &p.stages[0];
        assert_eq!(stage.location.as_deref(), Some("Pune office"));
        assert_eq!(stage.scheduled_date, Some(date(2024, 3, 6)));
        assert_eq!(stage.status_history.len(), 2);
    }

    #[test]
    fn test_bad_time_leaves_stage_untouched() {
        let mut p = process();
        let before = p.clone();
        let result = p.schedule_stage(
            0,
            ScheduleRequest {
                scheduled_time: Some("half past two".to_string()),
                location: Some("Remote".to_string()),
                ..Default::default()
            },
            None,
            now(),
        );
        assert!(matches!(result, Err(InterviewError::InvalidTime(_))));
        assert_eq!(p, before);
    }

    #[test]
    fn test_cannot_schedule_finished_stage() {
        let mut p = process();
        for status in [StageStatus::InProgress, StageStatus::Passed] {
            p.update_stage_status(
                0,
                StageUpdate {
                    status,
                    notes: None,
                    changed_by: None,
                    changed_by_model: ActorModel::Employer,
                    changed_at: now(),
                },
            )
            .unwrap();
        }
        let result = p.schedule_stage(0, ScheduleRequest::default(), None, now());
        assert!(matches!(result, Err(InterviewError::InvalidTransition { .. })));
    }

    #[test]
    fn test_schedule_out_of_range() {
        let mut p = process();
        assert_eq!(
            p.schedule_stage(5, ScheduleRequest::default(), None, now()),
            Err(InterviewError::InvalidStageIndex { index: 5, len: 2 })
        );
    }
}
