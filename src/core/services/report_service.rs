use crate::ai::AiProvider;
use crate::domain::{Conversation, MonthKey};
use crate::finance::report::{monthly_report, narrate, MonthlyReport};

pub struct ReportService;

impl ReportService {
    pub fn monthly(conversation: &Conversation, month: MonthKey) -> MonthlyReport {
        monthly_report(conversation, month)
    }

    /// Report plus narration (AI when available, deterministic summary otherwise).
    pub fn narrated(
        conversation: &Conversation,
        month: MonthKey,
        provider: Option<&dyn AiProvider>,
    ) -> (MonthlyReport, String) {
        let report = monthly_report(conversation, month);
        let text = narrate(&report, provider);
        (report, text)
    }
}
