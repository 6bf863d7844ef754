use crate::config::SheetsConfig;
use crate::error::ServiceError;
use crate::service::wire::LeadRow;
use crate::widget::form::Submission;
use crate::widget::LeadProfile;

/// Matches the host page's `toLocaleString()` output for en-US.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Appends demo leads to the spreadsheet web app. Outcomes are logged and
/// never reported to the user.
#[derive(Debug, Clone)]
pub struct LeadLogger {
    url: Option<String>,
    source: String,
}

impl LeadLogger {
    pub fn new(config: &SheetsConfig) -> Self {
        Self {
            url: config.url.clone(),
            source: config.source.clone(),
        }
    }

    pub fn row(&self, submission: &Submission, profile: &LeadProfile) -> LeadRow {
        LeadRow {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            name: submission.name.clone(),
            email: submission.email.clone(),
            phone: submission.phone.clone(),
            source: self.source.clone(),
            lead_score: profile.lead_score,
            stage: profile.stage.clone(),
        }
    }

    pub async fn record(
        &self,
        http: &reqwest::Client,
        submission: &Submission,
        profile: &LeadProfile,
    ) {
        let Some(url) = self.url.as_deref() else {
            tracing::debug!("no spreadsheet url configured; skipping lead row");
            return;
        };

        let row = self.row(submission, profile);
        match append(http, url, &row).await {
            Ok(()) => tracing::info!(email = %row.email, "lead row appended to spreadsheet"),
            Err(err) => tracing::warn!(error = %err, "failed to append lead row to spreadsheet"),
        }
    }
}

async fn append(http: &reqwest::Client, url: &str, row: &LeadRow) -> Result<(), ServiceError> {
    let resp = http.post(url).json(row).send().await?;
    if !resp.status().is_success() {
        return Err(ServiceError::status(resp.status()));
    }
    Ok(())
}
