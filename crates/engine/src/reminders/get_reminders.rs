use crate::shared::usecase::UseCase;
use pillbox_domain::Reminder;
use pillbox_infra::Context;

/// Lists the active reminders, soft-deleted records excluded.
#[derive(Debug)]
pub struct GetRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.find_active().await)
    }
}
