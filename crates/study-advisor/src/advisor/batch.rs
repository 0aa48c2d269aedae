//! Score every row of a CSV export in one pass.

use std::io::{Read, Write};

use serde::Serialize;
use tracing::{info, warn};

use super::model::ScoreModel;
use super::record::{FieldName, RawFields, RawValue};
use super::service::{AdvisorError, AdvisorService};

/// Column carrying the observed score in training-style exports.
pub const ACTUAL_SCORE_COLUMN: &str = "Exam_Score";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRowStatus {
    Scored {
        predicted: f64,
        actual: Option<f64>,
        headlines: Vec<String>,
    },
    Failed {
        error: String,
        field: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// One-based data row number, excluding the header.
    pub row: usize,
    #[serde(flatten)]
    pub status: BatchRowStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn scored(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.status, BatchRowStatus::Scored { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.scored()
    }

    /// Mean absolute error over rows that carry an observed score.
    pub fn mean_absolute_error(&self) -> Option<f64> {
        let errors: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| match &row.status {
                BatchRowStatus::Scored {
                    predicted,
                    actual: Some(actual),
                    ..
                } => Some((predicted - actual).abs()),
                _ => None,
            })
            .collect();

        if errors.is_empty() {
            None
        } else {
            Some(errors.iter().sum::<f64>() / errors.len() as f64)
        }
    }

    /// Write one result line per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["row", "predicted_score", "actual_score", "feedback", "error"])?;

        for row in &self.rows {
            let number = row.row.to_string();
            match &row.status {
                BatchRowStatus::Scored {
                    predicted,
                    actual,
                    headlines,
                } => {
                    let actual = actual.map(|value| value.to_string()).unwrap_or_default();
                    out.write_record([
                        number.as_str(),
                        format!("{predicted:.2}").as_str(),
                        actual.as_str(),
                        headlines.join("; ").as_str(),
                        "",
                    ])?;
                }
                BatchRowStatus::Failed { error, .. } => {
                    out.write_record([number.as_str(), "", "", "", error.as_str()])?;
                }
            }
        }

        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Score a CSV whose header names the nineteen fields; other columns are ignored.
pub fn score_csv<R, M>(reader: R, service: &AdvisorService<M>) -> Result<BatchReport, BatchError>
where
    R: Read,
    M: ScoreModel + 'static,
{
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header.trim() == name);

    let mut missing = Vec::new();
    let mut columns = Vec::with_capacity(FieldName::ALL.len());
    for field in FieldName::ALL {
        match column(field.as_str()) {
            Some(index) => columns.push((field, index)),
            None => missing.push(field.as_str().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(BatchError::MissingColumns(missing));
    }
    let actual_column = column(ACTUAL_SCORE_COLUMN);

    let mut report = BatchReport::default();
    for (index, result) in csv_reader.records().enumerate() {
        let number = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(row = number, error = %err, "unreadable CSV row");
                report.rows.push(BatchRow {
                    row: number,
                    status: BatchRowStatus::Failed {
                        error: err.to_string(),
                        field: None,
                    },
                });
                continue;
            }
        };
        // Short rows leave trailing fields absent so the assembler names them.
        let raw: RawFields = columns
            .iter()
            .filter_map(|(field, column)| {
                let cell = record.get(*column)?;
                Some((field.as_str().to_string(), RawValue::from_cell(cell)))
            })
            .collect();
        let actual = actual_column
            .and_then(|column| record.get(column))
            .and_then(|cell| cell.trim().parse::<f64>().ok());

        let status = match service.handle_predict_request(&raw) {
            Ok(outcome) => BatchRowStatus::Scored {
                predicted: outcome.prediction.score,
                actual,
                headlines: outcome
                    .feedback
                    .iter()
                    .map(|message| message.headline.clone())
                    .collect(),
            },
            Err(err) => BatchRowStatus::Failed {
                field: match &err {
                    AdvisorError::Validation(validation) => Some(validation.field().to_string()),
                    AdvisorError::Prediction(_) => None,
                },
                error: err.to_string(),
            },
        };

        report.rows.push(BatchRow {
            row: number,
            status,
        });
    }

    info!(
        rows = report.rows.len(),
        scored = report.scored(),
        failed = report.failed(),
        "batch scoring complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::feedback::FeedbackRules;
    use crate::advisor::model::FixedScoreModel;
    use std::sync::Arc;

    const HEADER: &str = "Hours_Studied,Attendance,Parental_Involvement,Access_to_Resources,\
Extracurricular_Activities,Sleep_Hours,Previous_Scores,Motivation_Level,Internet_Access,\
Tutoring_Sessions,Family_Income,Teacher_Quality,School_Type,Peer_Influence,Physical_Activity,\
Learning_Disabilities,Parental_Education_Level,Distance_from_Home,Gender,Exam_Score";

    fn service() -> AdvisorService<FixedScoreModel> {
        AdvisorService::new(Arc::new(FixedScoreModel(70.0)), FeedbackRules::default())
    }

    #[test]
    fn scores_rows_independently() {
        let rows = [
            "23,84,Low,High,No,7,73,Low,Yes,0,Low,Medium,Public,Positive,3,No,\
             High School,Near,Male,67",
            "20,90,High,Good,Yes,7.5,75,High,Yes,1,High,Good,Public,Positive,3,No,\
             Bachelor's,Short,Female,72",
        ];
        let csv = format!("{HEADER}\n{}\n", rows.join("\n"));

        let report = score_csv(csv.as_bytes(), &service()).expect("csv parses");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.scored(), 1);
        assert_eq!(report.failed(), 1);

        match &report.rows[0].status {
            BatchRowStatus::Failed { field, .. } => {
                assert_eq!(field.as_deref(), Some("Access_to_Resources"));
            }
            other => panic!("expected first row to fail, got {other:?}"),
        }
        match &report.rows[1].status {
            BatchRowStatus::Scored {
                predicted,
                actual,
                headlines,
            } => {
                assert_eq!(*predicted, 70.0);
                assert_eq!(*actual, Some(72.0));
                assert_eq!(headlines[0], "Insight");
            }
            other => panic!("expected second row to score, got {other:?}"),
        }
        assert_eq!(report.mean_absolute_error(), Some(2.0));
    }

    #[test]
    fn ragged_row_fails_without_losing_its_neighbours() {
        let good = "20,90,High,Good,Yes,7.5,75,High,Yes,1,High,Good,Public,Positive,3,No,\
                    Bachelor's,Near,Female,72";
        let csv = format!("{HEADER}\n{good}\n20,90,High\n{good}\n");

        let report = score_csv(csv.as_bytes(), &service()).expect("csv parses");
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.scored(), 2);
        assert_eq!(report.failed(), 1);

        match &report.rows[1] {
            BatchRow {
                row: 2,
                status: BatchRowStatus::Failed { field, .. },
            } => assert_eq!(field.as_deref(), Some("Access_to_Resources")),
            other => panic!("expected the short row to fail, got {other:?}"),
        }
        assert_eq!(report.rows[2].row, 3);
    }

    #[test]
    fn undecodable_row_is_reported_in_place() {
        let good = "20,90,High,Good,Yes,7.5,75,High,Yes,1,High,Good,Public,Positive,3,No,\
                    Bachelor's,Near,Female,72";
        let mut csv = format!("{HEADER}\n{good}\n").into_bytes();
        csv.extend_from_slice(b"20,90,\xff\xfe\n");
        csv.extend_from_slice(format!("{good}\n").as_bytes());

        let report = score_csv(csv.as_slice(), &service()).expect("csv parses");
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.scored(), 2);
        assert!(matches!(
            &report.rows[1].status,
            BatchRowStatus::Failed { field: None, .. }
        ));
    }

    #[test]
    fn missing_columns_are_reported_up_front() {
        let csv = "Hours_Studied,Attendance\n20,90\n";
        match score_csv(csv.as_bytes(), &service()) {
            Err(BatchError::MissingColumns(columns)) => {
                assert_eq!(columns.len(), 17);
                assert_eq!(columns[0], "Parental_Involvement");
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn writes_one_result_line_per_row() {
        let report = BatchReport {
            rows: vec![
                BatchRow {
                    row: 1,
                    status: BatchRowStatus::Scored {
                        predicted: 71.456,
                        actual: None,
                        headlines: vec![
                            "Stable Performance".to_string(),
                            "Top Priority".to_string(),
                        ],
                    },
                },
                BatchRow {
                    row: 2,
                    status: BatchRowStatus::Failed {
                        error: "Gender is required".to_string(),
                        field: Some("Gender".to_string()),
                    },
                },
            ],
        };

        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).expect("writes");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "row,predicted_score,actual_score,feedback,error");
        assert_eq!(lines[1], "1,71.46,,Stable Performance; Top Priority,");
        assert_eq!(lines[2], "2,,,,Gender is required");
    }
}
