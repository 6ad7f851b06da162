use std::io::{self, BufRead, Write};
use std::time::Duration;
use clap::{Args, Parser, Subcommand};

use contact_edge::client::{ContactForm, HttpTransport, SubmitError, SubmitOutcome, Suppressed};
use contact_edge::events::{EventPlan, EventType, MenuType};

#[derive(Parser)]
#[command(name = "contact-cli")]
#[command(about = "Send contact and event booking requests to a contact-edge endpoint", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/api/contact")]
    url: String,

    /// Hostname reported as the submission source.
    #[arg(short, long, default_value = "localhost")]
    source: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a contact request
    Submit {
        #[command(flatten)]
        contact: ContactArgs,
        /// Free-text budget, sent as given
        #[arg(long, default_value = "")]
        budget: String,
    },
    /// Send an event booking with a cost estimate
    Event {
        #[command(flatten)]
        contact: ContactArgs,
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Print the cost estimate for an event without sending anything
    Estimate(PlanArgs),
}

#[derive(Args)]
struct ContactArgs {
    /// Asked for on stdin when missing
    #[arg(long)]
    name: Option<String>,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    message: String,
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long, default_value = "birthday")]
    event_type: EventType,
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value_t = 10)]
    guests: u32,
    #[arg(long, default_value_t = 3)]
    hours: u32,
    #[arg(long, default_value = "standard")]
    menu: MenuType,
    /// Overrides the pizza count derived from the guests
    #[arg(long)]
    pizzas: Option<u32>,
    /// Overrides the drink count derived from the guests
    #[arg(long)]
    drinks: Option<u32>,
    #[arg(long)]
    cake: bool,
    /// Budget in whole euros
    #[arg(long)]
    budget: Option<u32>,
}

impl PlanArgs {
    fn plan(&self) -> EventPlan {
        let mut plan = EventPlan::default();
        plan.event_type = self.event_type;
        plan.event_date = self.date.clone();
        plan.menu = self.menu;
        plan.cake = self.cake;
        plan.budget = self.budget;
        plan.set_guests(self.guests);
        plan.set_duration(self.hours);
        if let Some(pizzas) = self.pizzas {
            plan.pizzas = pizzas;
        }
        if let Some(drinks) = self.drinks {
            plan.drinks = drinks;
        }
        plan
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    // The form session starts now. Flags can fill it faster than a person
    // could, so `send` waits out the rest of the minimum fill time.
    let mut form = ContactForm::new(HttpTransport::new(&cli.url), &cli.source);

    match cli.command {
        Commands::Submit { contact, budget } => {
            fill(&mut form, contact)?;
            form.draft_mut().budget = budget;
            report(send(&mut form).await);
        }
        Commands::Event { contact, plan } => {
            let plan = plan.plan();
            print_estimate(&plan);
            fill(&mut form, contact)?;
            plan.apply_to(form.draft_mut());
            report(send(&mut form).await);
        }
        Commands::Estimate(plan) => print_estimate(&plan.plan()),
    }

    Ok(())
}

async fn send(form: &mut ContactForm<HttpTransport>) -> Result<SubmitOutcome, SubmitError> {
    let remaining = form.fill_time_remaining_at(contact_edge::now_millis());
    if remaining > 0 {
        tokio::time::sleep(Duration::from_millis(remaining)).await;
    }
    form.submit().await
}

fn fill(form: &mut ContactForm<HttpTransport>, contact: ContactArgs) -> io::Result<()> {
    let name = match contact.name {
        Some(name) => name,
        None => prompt("Nimi")?,
    };
    let draft = form.draft_mut();
    draft.name = name;
    draft.phone = contact.phone;
    draft.email = contact.email;
    draft.message = contact.message;
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn print_estimate(plan: &EventPlan) {
    println!(
        "{} for {} guests, {}h, {} pizzas, {} drinks{}",
        plan.event_type,
        plan.guests(),
        plan.duration_hours(),
        plan.pizzas,
        plan.drinks,
        if plan.cake { ", cake" } else { "" }
    );
    match plan.estimated_cost() {
        Some(cost) => println!("Estimated cost: {cost}€"),
        None => println!("Custom menu: priced on request"),
    }
    if plan.is_over_budget() {
        println!("Warning: the estimate is above the budget");
    }
}

fn report(result: Result<SubmitOutcome, SubmitError>) {
    match result {
        Ok(SubmitOutcome::Sent) => println!("Sent."),
        Ok(SubmitOutcome::Suppressed(Suppressed::TooFast { elapsed_ms })) => {
            eprintln!("Form was submitted {elapsed_ms}ms after opening; nothing was sent.")
        }
        Ok(SubmitOutcome::Suppressed(Suppressed::Honeypot)) => {
            eprintln!("Honeypot filled; nothing was sent.")
        }
        Err(SubmitError::Invalid(invalid)) => eprintln!("{invalid}"),
        Err(SubmitError::Rejected { status, message }) => eprintln!("Error ({status}): {message}"),
        Err(SubmitError::Transport(e)) => eprintln!("Error: {e}"),
    }
}
