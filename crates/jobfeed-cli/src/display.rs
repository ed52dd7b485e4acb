use jobfeed_core::Vacancy;

/// Shown instead of a list when there is nothing to print.
pub const EMPTY_MESSAGE: &str = "No vacancies to display.";

/// Renders a numbered vacancy list for the terminal.
pub fn render_vacancies(vacancies: &[Vacancy]) -> String {
    if vacancies.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }

    let mut out = format!("Found {} vacancies:\n\n", vacancies.len());
    for (i, vacancy) in vacancies.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, vacancy));
        if let Some(avg) = vacancy.average_salary() {
            out.push_str(&format!("   Average: {:.0}\n", avg));
        }
        out.push('\n');
    }
    out
}
