use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use produksi::numeric::{format_count_for_display, format_for_display};
use produksi::CompletionWorkflow;

/// Walk every output row and the stock field, prefilled with the draft's
/// current values
pub fn edit_draft(workflow: &mut CompletionWorkflow) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let rows: Vec<_> = workflow
        .draft()
        .entries()
        .iter()
        .map(|e| (e.id, e.employee.clone(), e.output_weight))
        .collect();

    for (id, employee, weight) in rows {
        let text: String = Input::with_theme(&theme)
            .with_prompt(format!("{} (kg)", employee))
            .with_initial_text(format_for_display(weight))
            .allow_empty(true)
            .interact_text()?;
        workflow.input_output_weight(id, &text)?;
    }

    let text: String = Input::with_theme(&theme)
        .with_prompt("Finished stock (pcs)")
        .with_initial_text(format_count_for_display(workflow.draft().manual_stock()))
        .allow_empty(true)
        .interact_text()?;
    workflow.input_manual_stock(&text)?;

    Ok(())
}

pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
