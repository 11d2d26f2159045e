use crate::core::state::AppState;
use crate::schemas::result::ExamResult;
use crate::store::StoreError;

/// Persist a finished real-mode exam. The device history write is awaited so
/// the examinee sees their own score immediately; the shared archive write is
/// fired off in the background and only logged on failure, so a slow or
/// broken archive never blocks submission.
pub(crate) async fn record_real_result(
    state: &AppState,
    result: ExamResult,
) -> Result<(), StoreError> {
    state.local().append_history(result.clone()).await?;

    let archive = state.results().clone();
    tokio::spawn(async move {
        match archive.append(result).await {
            Ok(id) => {
                metrics::counter!("exam_results_recorded_total").increment(1);
                tracing::debug!(result_id = %id, "Archived exam result");
            }
            Err(err) => {
                metrics::counter!("exam_results_archive_failures_total").increment(1);
                tracing::warn!(error = %err, "Failed to archive exam result");
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn result() -> ExamResult {
        ExamResult {
            id: None,
            name: "Tester".to_string(),
            category: "Chiensimoi".to_string(),
            rank: "Binh nhì".to_string(),
            role: "Chiến sĩ".to_string(),
            unit: "c2".to_string(),
            timestamp: "2025-03-10T08:20:00Z".to_string(),
            correct_count: 20,
            total_count: 25,
            score: "8.00".to_string(),
            answers: vec![1, -1],
            questions: vec![],
        }
    }

    #[tokio::test]
    async fn records_to_history_and_archive() {
        let ctx = test_support::setup_test_context().await;

        record_real_result(&ctx.state, result()).await.expect("record");

        let history = ctx.state.local().load().await.expect("local").history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Tester");

        // The archive write is async; poll briefly for it to land.
        for _ in 0..50 {
            if !ctx.state.results().list().await.expect("list").is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let archived = ctx.state.results().list().await.expect("list");
        assert_eq!(archived.len(), 1);
        assert!(archived[0].id.is_some());
    }
}
