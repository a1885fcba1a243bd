use super::Client;
use crate::error::Result;
use crate::form::Form;
use crate::result::ApiResult;

const SCHEDULE_JOB_EXIST_PATH: &str = "/v2/schedule_job/exist";
const SCHEDULE_JOB_DELETE_PATH: &str = "/v2/schedule_job/delete";

impl Client {
    /// Asks whether a scheduled message is still pending.
    ///
    /// The job exists when the returned code is 0.
    #[tracing::instrument(skip(self))]
    pub async fn schedule_job_exists(&self, job_id: &str) -> Result<ApiResult> {
        self.post(SCHEDULE_JOB_EXIST_PATH, &job_form(job_id)).await
    }

    /// Cancels a scheduled message.
    #[tracing::instrument(skip(self))]
    pub async fn delete_schedule_job(&self, job_id: &str) -> Result<ApiResult> {
        self.post(SCHEDULE_JOB_DELETE_PATH, &job_form(job_id)).await
    }
}

fn job_form(job_id: &str) -> Form {
    let mut form = Form::new();
    form.add("job_id", job_id);
    form
}
