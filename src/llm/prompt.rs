// src/llm/prompt.rs
use crate::screener::models::RatioSet;

/// Character budget for transcript text inside the prompt.
pub const TRANSCRIPT_CHAR_BUDGET: usize = 165_000;

/// Everything a report prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub ticker: &'a str,
    pub local_ratios: &'a RatioSet,
    pub remote_ratios: &'a RatioSet,
    pub transcripts: &'a str,
}

/// Returns the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_prompt(inputs: &PromptInputs<'_>) -> String {
    let ticker = inputs.ticker;
    let transcripts = truncate_chars(inputs.transcripts, TRANSCRIPT_CHAR_BUDGET);

    format!(
        "Company: {ticker}\n\
         \n\
         DATA:\n\
         - Fundamental Ratios and data: {local}\n\
         - Ratios: {remote}\n\
         - Transcript Snippets: {transcripts}\n\
         \n\
         Assume the role of an experienced fund manager with over 20 years in the stock market. \
         Analyze the company {ticker} and provide a detailed report covering the following aspects:\n\
         {outline}",
        local = inputs.local_ratios,
        remote = inputs.remote_ratios,
        outline = REPORT_OUTLINE,
    )
}

const REPORT_OUTLINE: &str = "\
1. Company History and Management:
   - Outline the company's background, including its inception, evolution, and key milestones.
   - Evaluate the credibility and experience of the management team, highlighting their track record in the industry.
2. Business Model:
   - Explain how the company generates revenue, detailing its primary objectives, with examples of products or services and target markets that people from other fields can follow.
   - Describe the cost structure and key factors influencing profitability.
   - Keep the business model simple enough that a 15-year-old could understand it; if a business is too complex to understand, it may not be a suitable investment.
3. Competitive Advantage (Moat):
   - Identify the company's unique selling propositions and what differentiates it from competitors.
   - Discuss any barriers to entry that protect the company's market position.
4. Future Plans and Growth Prospects:
   - Summarize strategic initiatives such as planned product launches, market expansions, or mergers and acquisitions.
   - Analyze the industry's growth rate and assess the company's potential to outpace it.
5. Financial Health:
   - Review key financial metrics, including revenue and profit trends over the past five years.
   - Evaluate the strength of the balance sheet by examining assets, liabilities, and equity.
   - Analyze cash flow statements to determine the company's ability to generate and use cash effectively.
6. Valuation:
   - Calculate and interpret valuation ratios such as Price-to-Earnings (P/E), Price-to-Book (P/B), and any other relevant metrics.
   - Compare these ratios to industry averages to assess whether the stock is overvalued, undervalued, or fairly priced.
7. Pros and Cons:
   - Highlight the strengths and opportunities that make the company a compelling investment.
   - Discuss potential weaknesses and threats that could impact the company's performance.
8. Five-Year Financial Projections:
   - Provide forecasted financial statements, including projected revenues, expenses, and earnings per share (EPS) for the next five years.
   - Outline the assumptions behind these projections and the risks to achieving them.
9. Give the risks of investing in this share, with brief points on why it could go down and why it could go up.
10. Give a fair price for this stock, but state that no one should invest based on this price since it may not be accurate.

Ensure that the analysis is thorough, data-driven, and understandable to a layperson. Use examples where appropriate. \
If certain information is unavailable in the transcripts or the given data, say so clearly in the report. Never hallucinate.
";
