use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use xpost_module::{
    LoopbackRelayer, ModuleConfig, MsgSendIbcPost, RelayReport, SimulatedChain,
};
use xpost_types::{Height, Ordering, PostPayload};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Send(args) => cmd_send(args, config, cli.format),
        Command::Demo(_) => cmd_demo(config, cli.format),
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<ModuleConfig> {
    match path {
        Some(path) => ModuleConfig::load(path).with_context(|| format!("loading {path}")),
        None => Ok(ModuleConfig::default()),
    }
}

fn connect(config: ModuleConfig) -> anyhow::Result<(SimulatedChain, SimulatedChain, LoopbackRelayer)> {
    let mars = SimulatedChain::new("mars", config.clone());
    let venus = SimulatedChain::new("venus", config);
    let link = LoopbackRelayer::connect(&mars, &venus, Ordering::Unordered)?;
    Ok((mars, venus, link))
}

fn cmd_send(args: SendArgs, config: ModuleConfig, format: OutputFormat) -> anyhow::Result<()> {
    let (mars, venus, link) = connect(config)?;

    let packet = match args.timeout_height {
        Some(height) => {
            let payload = PostPayload::new(&args.creator, &args.title, &args.content);
            let timestamp = args
                .timeout_timestamp
                .map(|offset| mars.timestamp().saturating_add(offset))
                .unwrap_or(0);
            mars.keeper().transmit_post(
                &payload,
                &link.a_port,
                &link.a_channel,
                Height::new(0, height),
                timestamp,
            )?
        }
        None => {
            let timestamp = args
                .timeout_timestamp
                .map(|offset| mars.timestamp().saturating_add(offset))
                .unwrap_or(0);
            let msg = MsgSendIbcPost::new(
                &args.creator,
                &link.a_port,
                &link.a_channel,
                timestamp,
                &args.title,
                &args.content,
            );
            mars.send(&msg)?
        }
    };

    venus.advance_blocks(args.dest_height);
    let report = link.relay(&mars, &venus)?;
    let settlement = mars.keeper().settlement(&packet)?;

    match format {
        OutputFormat::Json => {
            let out = json!({
                "packet": packet.to_string(),
                "settlement": settlement.as_ref().map(|s| s.label()),
                "report": serde_json::to_value(&report)?,
                "source": chain_json(&mars)?,
                "destination": chain_json(&venus)?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} Sent packet {}", "✓".green().bold(), packet.to_string().yellow());
            match &settlement {
                Some(s) => println!("  Outcome: {}", s.to_string().cyan()),
                None => println!("  Outcome: {}", "pending".dimmed()),
            }
            print_report(&report);
            print_chain(&mars)?;
            print_chain(&venus)?;
        }
    }
    Ok(())
}

fn cmd_demo(config: ModuleConfig, format: OutputFormat) -> anyhow::Result<()> {
    let (mars, venus, link) = connect(config)?;

    let ok = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "Hello", "from mars");
    mars.send(&ok)?;

    // A client that skipped validation: venus refuses an empty title.
    mars.keeper().transmit_post(
        &PostPayload::new("bob", "", "no title"),
        &link.a_port,
        &link.a_channel,
        Height::new(0, 1_000),
        0,
    )?;

    let deadline = venus.height().revision_height + 2;
    mars.keeper().transmit_post(
        &PostPayload::new("carol", "Late", "never arrives"),
        &link.a_port,
        &link.a_channel,
        Height::new(0, deadline),
        0,
    )?;
    venus.advance_blocks(2);

    let report = link.relay(&mars, &venus)?;

    match format {
        OutputFormat::Json => {
            let out = json!({
                "report": serde_json::to_value(&report)?,
                "chains": [chain_json(&mars)?, chain_json(&venus)?],
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            print_report(&report);
            print_chain(&mars)?;
            print_chain(&venus)?;
        }
    }
    Ok(())
}

fn chain_json(chain: &SimulatedChain) -> anyhow::Result<Value> {
    let keeper = chain.keeper();
    Ok(json!({
        "chain": chain.chain_id(),
        "height": chain.height().to_string(),
        "posts": serde_json::to_value(keeper.posts()?)?,
        "sentPosts": serde_json::to_value(keeper.sent_posts()?)?,
        "timedOutPosts": serde_json::to_value(keeper.timed_out_posts()?)?,
    }))
}

fn print_report(report: &RelayReport) {
    println!(
        "Relay: {} delivered, {} acknowledged, {} rejected, {} timed out, {} failed",
        report.delivered.to_string().bold(),
        report.acknowledged.to_string().green(),
        report.rejected.to_string().red(),
        report.timed_out.to_string().yellow(),
        report.failed
    );
}

fn print_chain(chain: &SimulatedChain) -> anyhow::Result<()> {
    let keeper = chain.keeper();
    println!("\n{} (height {})", chain.chain_id().bold(), chain.height());

    let posts = keeper.posts()?;
    println!("  {} ({})", "posts".underline(), posts.len());
    for p in &posts {
        println!("    #{} {} by {}: {}", p.id, p.title.bold(), p.creator.cyan(), p.content);
    }

    let sent = keeper.sent_posts()?;
    println!("  {} ({})", "sent posts".underline(), sent.len());
    for s in &sent {
        println!(
            "    #{} {} to {} as post {}",
            s.id,
            s.title.bold(),
            s.chain.blue(),
            s.post_id.green()
        );
    }

    let timed_out = keeper.timed_out_posts()?;
    println!("  {} ({})", "timed-out posts".underline(), timed_out.len());
    for t in &timed_out {
        println!("    #{} {} to {} by {}", t.id, t.title.bold(), t.chain.blue(), t.creator.cyan());
    }
    Ok(())
}
