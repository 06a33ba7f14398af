use sage_scope::fallback;
use sage_scope::models::*;
use sage_scope::normalize::{normalize_or_fallback, normalize_stage, ParseError};
use speculate2::speculate;

const PAYMENTS: &str = r#"{"id":"feat-payments","title":"Payments page","description":"Card checkout"}"#;

speculate! {
    describe "response shapes" {
        it "unwraps every stage's envelope" {
            let samples = [
                (Stage::FeatureExtraction, format!(r#"{{"features":[{PAYMENTS}]}}"#)),
                (Stage::PriorityAnalysis, r#"{"priorities":[{"feature":"Payments page","priority":"high","reasoning":"Revenue"}]}"#.to_string()),
                (Stage::RiskAnalysis, r#"{"risks":[{"title":"PCI","description":"Card data","severity":"high","category":"resource","impact":"Audit","mitigation":"Hosted checkout"}]}"#.to_string()),
                (Stage::PocGeneration, r#"{"pocVersions":[{"title":"Charge early","focus":"revenue","features":["Payments page"],"timeEstimate":"3 weeks","cost":18000}]}"#.to_string()),
                (Stage::MvpGeneration, r#"{"mvpDeliverables":[{"title":"Checkout","description":"Hosted checkout","timeEstimate":"3 weeks","cost":18000.5}]}"#.to_string()),
            ];

            for (stage, raw) in samples {
                let output = normalize_stage(stage, &raw).unwrap();
                assert_eq!(output.stage(), stage);
                assert_eq!(output.len(), 1, "{stage:?}");
            }
        }

        it "accepts a bare array" {
            let raw = format!("[{PAYMENTS}, {PAYMENTS}]");
            let output = normalize_stage(Stage::FeatureExtraction, &raw).unwrap();
            assert_eq!(output.len(), 2);
        }

        it "wraps a lone object into a one-element collection" {
            match normalize_stage(Stage::FeatureExtraction, PAYMENTS).unwrap() {
                StageOutput::Features(features) => {
                    assert_eq!(features.len(), 1);
                    assert_eq!(features[0].id, "feat-payments");
                }
                other => panic!("unexpected output {other:?}"),
            }
        }

        it "tolerates surrounding whitespace" {
            let raw = format!("\n  {{\"features\":[{PAYMENTS}]}}  \n");
            assert!(normalize_stage(Stage::FeatureExtraction, &raw).is_ok());
        }
    }

    describe "unusable responses" {
        it "reports prose as a JSON error" {
            let err = normalize_stage(Stage::RiskAnalysis, "I could not find any risks.").unwrap_err();
            assert!(matches!(err, ParseError::Json { .. }));
            assert!(err.to_string().starts_with("risk-analysis"));
        }

        it "reports an unknown enum value as a shape error" {
            let raw = r#"{"priorities":[{"feature":"Login","priority":"urgent","reasoning":"Now"}]}"#;
            let err = normalize_stage(Stage::PriorityAnalysis, raw).unwrap_err();
            assert!(matches!(err, ParseError::Shape { index: 0, .. }));
        }

        it "reports an empty feature title as invalid" {
            let raw = r#"[{"title":"Login","description":"a"},{"title":"  ","description":"b"}]"#;
            let err = normalize_stage(Stage::FeatureExtraction, raw).unwrap_err();
            assert!(matches!(err, ParseError::Invalid { index: 1, .. }));
        }

        it "falls back to the stage's placeholder data" {
            let (output, used_fallback) = normalize_or_fallback(Stage::MvpGeneration, "null");
            assert!(used_fallback);
            assert_eq!(output, StageOutput::MvpDeliverables(fallback::mvp_deliverables()));
        }

        it "keeps usable output" {
            let (output, used_fallback) = normalize_or_fallback(Stage::FeatureExtraction, PAYMENTS);
            assert!(!used_fallback);
            assert_eq!(output.len(), 1);
        }
    }

    describe "placeholder data" {
        it "is complete for every stage" {
            assert_eq!(fallback::features().len(), 5);
            assert_eq!(fallback::priorities().len(), 5);
            assert!(!fallback::risks().is_empty());
            assert_eq!(fallback::poc_versions().len(), 3);
            assert_eq!(total_cost(&fallback::mvp_deliverables()), 60000.0);
        }

        it "refers to fallback features by title" {
            let titles: Vec<String> = fallback::features().into_iter().map(|f| f.title).collect();
            for priority in fallback::priorities() {
                assert!(titles.contains(&priority.feature), "{}", priority.feature);
            }
        }
    }
}
