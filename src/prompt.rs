/// The instruction sent with every page. `{text}` is replaced by the page text.
pub const SUMMARY_TEMPLATE: &str = "
You are an analyst reviewing company web content.
Summarize the following page text. Focus on:
- Operational details (departments, workflows, key processes)
- Unique value propositions
- Opportunities for using AI (automation, content generation, decision support)

Text:
{text}

Structured summary:
";

/// The `PromptBuilder` struct is responsible for turning page text into a summary prompt.
/// It fills the template's `{text}` slot with a prefix of the page no longer than the budget.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    /// The template containing one `{text}` slot.
    template: String,
    /// The maximum number of characters of page text to include.
    budget: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(SUMMARY_TEMPLATE)
    }
}

impl PromptBuilder {
    /// Creates a new `PromptBuilder` with the given template and the default text budget.
    ///
    /// # Arguments
    ///
    /// * `template` - The prompt template; `{text}` marks where the page text goes.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            budget: crate::DEFAULT_TEXT_BUDGET,
        }
    }

    /// Sets the number of characters of page text kept in the prompt.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Builds the prompt for the given page text.
    ///
    /// # Returns
    ///
    /// The template with `{text}` replaced by the truncated page text.
    pub fn build(&self, text: &str) -> String {
        self.template.replace("{text}", truncate(text, self.budget))
    }
}

/// Returns the first `budget` characters of `text`.
pub fn truncate(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
