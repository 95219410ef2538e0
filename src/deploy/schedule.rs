use crate::error::RemoteError;
use crate::http::WorkersApi;

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleTarget {
    pub script_name: String,
    pub crons: Vec<String>,
}

impl ScheduleTarget {
    pub fn build(script_name: String, crons: Vec<String>) -> Self {
        // Expressions are validated by the API; nothing is checked locally.
        ScheduleTarget { script_name, crons }
    }

    pub fn deploy(&self, api: &impl WorkersApi) -> Result<Vec<String>, RemoteError> {
        log::info!("publishing schedules");
        let schedules = api.update_schedules(&self.script_name, &self.crons)?;

        if schedules.is_empty() {
            return Ok(self.crons.clone());
        }
        Ok(schedules.into_iter().map(|s| s.cron).collect())
    }
}
