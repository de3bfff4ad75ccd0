use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use vc6batch::exec::{JobExecutor, JobInvocation};
use vc6batch::job::JobResult;

/// A fake executor that:
/// - records every invocation it receives
/// - returns a scripted result per job label, or a successful result with
///   `"<label> ok"` on stdout when nothing was scripted.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    scripted: HashMap<String, JobResult>,
    executed: Vec<JobInvocation>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, label: &str, result: JobResult) -> Self {
        self.scripted.insert(label.to_string(), result);
        self
    }

    pub fn failing(self, label: &str, exit_code: i32, stderr: &str) -> Self {
        self.with_result(
            label,
            JobResult::exited(Some(exit_code), String::new(), stderr.to_string()),
        )
    }

    pub fn executed(&self) -> &[JobInvocation] {
        &self.executed
    }

    pub fn executed_labels(&self) -> Vec<String> {
        self.executed.iter().map(|inv| inv.label.clone()).collect()
    }
}

impl JobExecutor for FakeExecutor {
    fn execute(
        &mut self,
        invocation: JobInvocation,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + '_>> {
        let result = self.scripted.get(&invocation.label).cloned().unwrap_or_else(|| {
            JobResult::exited(Some(0), format!("{} ok\n", invocation.label), String::new())
        });
        self.executed.push(invocation);

        Box::pin(async move { result })
    }
}
