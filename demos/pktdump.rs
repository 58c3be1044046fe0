//! Dump the contents of a FidoNet packet
//!
//! Run with: cargo run --example pktdump -- path/to/file.pkt [--repair]

use ftngate::packet;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: pktdump <file.pkt> [--repair]");
        return ExitCode::FAILURE;
    };
    let repair = args.any(|arg| arg == "--repair");

    let mut data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let analysis = packet::analyze(&data);
    if !analysis.embedded_nulls.is_empty() {
        println!("{} embedded NUL(s):", analysis.embedded_nulls.len());
        for null in &analysis.embedded_nulls {
            println!("  message {} at offset {}", null.message, null.offset);
        }
        if repair {
            match packet::repair(&data) {
                Ok(outcome) => data = outcome.bytes,
                Err(e) => {
                    eprintln!("repair failed: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    let (header, messages) = match packet::parse(&data) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Packet {} -> {}", header.origin(), header.destination());
    if let Some(created) = header.created() {
        println!("Created {created}");
    }
    println!("Password {:?}, {} message(s)", header.password(), messages.len());

    for (i, message) in messages.iter().enumerate() {
        println!();
        println!("#{i} {}", if message.is_echomail() { message.area.as_str() } else { "NETMAIL" });
        println!("  From:    {} ({}/{})", message.from, message.orig_net, message.orig_node);
        println!("  To:      {} ({}/{})", message.to, message.dest_net, message.dest_node);
        println!("  Subject: {}", message.subject);
        println!("  Date:    {}", message.date);
        println!("  Charset: {:?}", message.charset);
        if let Some(msgid) = &message.kludges.msgid {
            println!("  MSGID:   {msgid}");
        }
        if let Some(reply) = &message.kludges.reply {
            println!("  REPLY:   {reply}");
        }
        for (key, value) in &message.kludges.other {
            println!("  {key}: {value}");
        }
        println!();
        for line in message.body_text().lines() {
            println!("  | {line}");
        }
        if let Some(origin) = &message.origin {
            println!("  * Origin: {origin}");
        }
        if !message.seen_by.is_empty() {
            println!("  SEEN-BY: {}", message.seen_by.join(" "));
        }
    }

    ExitCode::SUCCESS
}
