use rand::distributions::Alphanumeric;
use rand::Rng;

use team_roster::roster::{roster_stats, shuffle, EligibilityIndex, Ledger, ShuffleMode};
use team_roster::{display, logging, parser, web, AvailabilityStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args
            .get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            let generated: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(12)
                .map(char::from)
                .collect();
            println!("ADMIN_PASSWORD not set; generated for this run: {}", generated);
            generated
        });

        println!("Starting web server on port {}...", port);
        println!("Access the site at http://localhost:{}", port);

        web::start_server(port, password).await?;
        return Ok(());
    }

    // CLI mode: plan + members in, full shuffle, roster out
    let plan_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "data/plan.json".to_string());
    let members_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "data/members.csv".to_string());

    println!("Loading roster plan from {}...", plan_path);
    let plan = parser::load_plan(&plan_path)?;
    println!(
        "Loaded {} roles and {} events",
        plan.roles.len(),
        plan.events.len()
    );

    println!("Loading members from {}...", members_path);
    let import = parser::load_members(&members_path)?;
    println!(
        "Loaded {} members ({} unavailability records)",
        import.members.len(),
        import.availability.len()
    );

    println!("\n=== Running Auto-Assignment ===");
    let availability = AvailabilityStore::from_records(import.availability);
    let eligibility = EligibilityIndex::build(&import.members);
    let outcome = shuffle(
        &plan.events,
        &plan.roles,
        &eligibility,
        &availability,
        &Ledger::new(),
        ShuffleMode::FillAll,
    )?;
    println!("Filled {} slots\n", outcome.filled);

    display::print_roster(&plan.events, &plan.roles, &import.members, &outcome.ledger);
    let stats = roster_stats(&outcome.ledger, &plan.events, &plan.roles);
    display::print_stats(&stats);

    display::write_roster_to_file(
        &plan.events,
        &plan.roles,
        &import.members,
        &outcome.ledger,
        "roster.txt",
    )?;
    println!("\nRoster saved to roster.txt");

    Ok(())
}
