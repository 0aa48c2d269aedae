//! End-to-end scenarios against the bundled sample artifacts.
//!
//! Everything goes through the public service facade, the HTTP router, or the
//! batch scorer, with the real preprocessor and regressor loaded from disk.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use study_advisor::advisor::{
        AdvisorService, ArtifactModel, ArtifactPaths, FeedbackRules, RawFields, StudentRecord,
    };

    pub(super) fn artifact_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts")
    }

    pub(super) fn sample_paths() -> ArtifactPaths {
        let dir = artifact_dir();
        ArtifactPaths {
            model: dir.join("student_performance_model.json"),
            preprocessor: dir.join("student_data_preprocessor.json"),
        }
    }

    pub(super) fn build_service() -> AdvisorService<ArtifactModel> {
        let model = ArtifactModel::load(&sample_paths()).expect("sample artifacts load");
        AdvisorService::new(Arc::new(model), FeedbackRules::default())
    }

    pub(super) fn default_form() -> RawFields {
        StudentRecord::default().to_raw()
    }
}

mod prediction {
    use super::common::*;
    use study_advisor::advisor::{
        AdvisorError, ArtifactModel, ArtifactPaths, FeedbackKind, FieldName, PredictionSession,
        RawValue, ScoreModel, StartupError, StudentRecord,
    };

    #[test]
    fn default_form_predicts_a_stable_score() {
        let service = build_service();
        let outcome = service
            .handle_predict_request(&default_form())
            .expect("default form predicts");

        assert!(
            (73.0..75.5).contains(&outcome.prediction.score),
            "unexpected score {}",
            outcome.prediction.score
        );
        assert_eq!(outcome.feedback[0].kind, FeedbackKind::TrendStable);
        assert_eq!(outcome.feedback.len(), 6);
    }

    #[test]
    fn better_habits_raise_the_prediction() {
        let service = build_service();
        let baseline = service
            .handle_predict_request(&default_form())
            .expect("baseline predicts");

        let mut form = default_form();
        form.insert(FieldName::HoursStudied.to_string(), RawValue::Integer(35));
        form.insert(FieldName::Attendance.to_string(), RawValue::Integer(98));
        form.insert(FieldName::SleepHours.to_string(), RawValue::Float(8.0));
        form.insert(FieldName::TutoringSessions.to_string(), RawValue::Integer(3));
        form.insert(
            FieldName::ExtracurricularActivities.to_string(),
            RawValue::Text("No".to_string()),
        );

        let improved = service.handle_predict_request(&form).expect("form predicts");
        assert!(improved.prediction.score > baseline.prediction.score + 2.0);
        assert_eq!(improved.feedback[0].kind, FeedbackKind::TrendImprovement);
        assert_eq!(improved.feedback[1].kind, FeedbackKind::StudyHoursOnTrack);
    }

    #[test]
    fn every_level_of_every_field_is_encodable() {
        let model = ArtifactModel::load(&sample_paths()).expect("sample artifacts load");
        let width = model.preprocessor().output_width();

        for spec in StudentRecord::catalogue() {
            if let study_advisor::advisor::FieldDomain::Levels { levels } = spec.domain {
                for level in levels {
                    let mut form = default_form();
                    form.insert(spec.name.to_string(), RawValue::Text(level.to_string()));
                    let record =
                        study_advisor::advisor::assemble(&form).expect("level is accepted");
                    let features = model.transform(&record).expect("level is encodable");
                    assert_eq!(features.len(), width);
                }
            }
        }
    }

    #[test]
    fn invalid_input_leaves_the_session_untouched() {
        let service = build_service();
        let mut session = PredictionSession::new();
        service
            .predict_into(&mut session, &default_form())
            .expect("default form predicts");
        let stored = session.last().expect("stored").prediction;

        let mut form = default_form();
        form.insert(FieldName::Attendance.to_string(), RawValue::Integer(45));
        match service.predict_into(&mut session, &form) {
            Err(AdvisorError::Validation(err)) => assert_eq!(err.field(), "Attendance"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(session.last().expect("still stored").prediction, stored);
    }

    #[test]
    fn missing_artifact_is_a_startup_error() {
        let paths = ArtifactPaths {
            model: artifact_dir().join("does_not_exist.json"),
            ..sample_paths()
        };

        match ArtifactModel::load(&paths) {
            Err(StartupError::Missing { path }) => assert_eq!(path, paths.model),
            other => panic!("expected missing artifact, got {other:?}"),
        }
    }

    #[test]
    fn swapped_artifacts_are_rejected() {
        let sample = sample_paths();
        let paths = ArtifactPaths {
            model: sample.preprocessor.clone(),
            preprocessor: sample.model,
        };

        assert!(matches!(
            ArtifactModel::load(&paths),
            Err(StartupError::Parse { .. })
        ));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use study_advisor::advisor::advisor_router;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        advisor_router(Arc::new(build_service()))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn post_predictions_returns_score_and_feedback() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/predictions")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&default_form()).expect("serialize form"),
            ))
            .expect("request");

        let response = build_router()
            .oneshot(request)
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        let display = payload["prediction"]["display"]
            .as_str()
            .expect("display string");
        assert_eq!(display.split('.').nth(1).map(str::len), Some(2));
        assert_eq!(payload["feedback"][0]["headline"], "Stable Performance");
    }

    #[tokio::test]
    async fn post_predictions_rejects_unknown_fields() {
        let mut form = serde_json::to_value(default_form()).expect("form value");
        form["Favourite_Colour"] = json!("Blue");

        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/predictions")
                    .header("content-type", "application/json")
                    .body(Body::from(form.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(response).await;
        assert_eq!(payload["field"], "Favourite_Colour");
    }

    #[tokio::test]
    async fn get_fields_returns_the_catalogue() {
        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/fields")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["fields"].as_array().map(Vec::len), Some(19));
    }
}

mod batch {
    use super::common::*;
    use study_advisor::advisor::{score_csv, BatchRowStatus, FieldName};

    fn header() -> String {
        let mut columns: Vec<&str> = FieldName::ALL.iter().map(|field| field.as_str()).collect();
        columns.push("Exam_Score");
        columns.join(",")
    }

    #[test]
    fn scores_a_training_style_export() {
        let csv = format!(
            "{}\n{}\n{}\n",
            header(),
            "20,90,High,Good,Yes,7,75,High,Yes,1,High,Good,Public,Positive,3,No,\
             Bachelor's,Short,Female,74",
            "20,90,High,Good,Yes,7,75,High,Yes,1,High,Good,Public,Positive,3,Maybe,\
             Bachelor's,Short,Female,70",
        );

        let report = score_csv(csv.as_bytes(), &build_service()).expect("csv parses");
        assert_eq!(report.scored(), 1);
        assert_eq!(report.failed(), 1);
        let mae = report.mean_absolute_error().expect("actual score present");
        assert!(mae < 1.5, "unexpected error {mae}");

        match &report.rows[1].status {
            BatchRowStatus::Failed { field, .. } => {
                assert_eq!(field.as_deref(), Some("Learning_Disabilities"));
            }
            other => panic!("expected second row to fail, got {other:?}"),
        }
    }
}
