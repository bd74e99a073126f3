use console::style;
use produksi::conservation::ValidationResult;
use produksi::{CompletionDraft, HttpProductionApi, ProductionApi, ProductionRun};

use super::messages;

pub async fn run(api: &HttpProductionApi, id: u64) -> anyhow::Result<()> {
    let run = api.fetch_run(id).await?;
    print_run(&run);
    print_totals(&run, &CompletionDraft::initialize(&run));
    Ok(())
}

pub fn print_run(run: &ProductionRun) {
    println!();
    println!(
        "{} {}",
        style(format!("Production {}", run.code)).cyan().bold(),
        style(format!("({})", run.status.label())).dim()
    );
    if let Some(product) = &run.product_name {
        println!("  Product   {}", product);
    }
    if let Some(started) = run.started_on {
        println!("  Started   {}", started);
    }
    if let Some(due) = run.due_on {
        println!("  Due       {}", due);
    }
    if run.is_completed() {
        println!("  Stock     {} pcs", run.recorded_stock);
    }

    println!();
    println!("{}", style("Materials").bold());
    if run.materials.is_empty() {
        println!("  {}", style("none recorded").dim());
    }
    for material in &run.materials {
        let name = material.name.as_deref().unwrap_or("Unnamed material");
        println!("  {:<32} {:>10} kg", name, material.weight.to_string());
    }

    println!();
    println!("{}", style("Employee output").bold());
    if run.outputs.is_empty() {
        println!("  {}", style("no employees assigned").dim());
    }
    for output in &run.outputs {
        println!(
            "  {:<32} {:>10} kg  {}",
            output.employee,
            output.output_weight.to_string(),
            style(format!("#{}", output.id)).dim()
        );
    }
}

pub fn print_totals(run: &ProductionRun, draft: &CompletionDraft) {
    let output = draft.total_output_weight();
    let input = draft.total_material_input(run);

    println!();
    println!("  {:<32} {:>10} kg", "Total material", input.to_string());
    println!("  {:<32} {:>10} kg", "Total output", output.to_string());
    println!();
}

/// Current local verdict on the draft
pub fn print_verdict(verdict: ValidationResult, draft: &CompletionDraft) {
    match verdict {
        ValidationResult::Valid => println!("  {} ready to submit", style("✓").green()),
        ValidationResult::Invalid(violation) => println!(
            "  {} {}",
            style("!").yellow().bold(),
            messages::violation(&violation, draft)
        ),
    }
}
