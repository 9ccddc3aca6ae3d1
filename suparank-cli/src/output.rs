/// Output formatting: terminal table and JSON.
use serde::Serialize;
use suparank_core::{Item, Next, NextResponse, Rankings};

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: &'a str,
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct JsonRankings<'a> {
    items: Vec<JsonRankedItem<'a>>,
    complete: bool,
    comparisons: usize,
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to encode JSON output: {e}")),
    }
}

/// Print items as a table, numbered from 1.
pub fn print_table(items: &[Item]) {
    let id_width = items.iter().map(|i| i.id.len()).max().unwrap_or(2).max(2);
    let title_width = items
        .iter()
        .map(|i| i.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5); // at least "Title"

    println!(" # | {:<id_width$} | {:<title_width$} | Description", "ID", "Title");
    println!("---|-{}-|-{}-|------------", "-".repeat(id_width), "-".repeat(title_width));

    for (i, item) in items.iter().enumerate() {
        let description = item.description.lines().next().unwrap_or("");
        println!(
            "{:>2} | {:<id_width$} | {:<title_width$} | {}",
            i + 1,
            item.id,
            item.title,
            description,
        );
    }
}

/// Print a ranking, flagging it when the session is not finished.
pub fn print_rankings(rankings: &Rankings) {
    print_table(&rankings.items);
    if rankings.complete {
        println!(
            "\n{} items ranked ({} comparisons)",
            rankings.items.len(),
            rankings.comparisons,
        );
    } else {
        println!(
            "\nRanking in progress after {} comparisons, order is provisional",
            rankings.comparisons,
        );
    }
}

pub fn print_rankings_json(rankings: &Rankings) {
    let items = rankings
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| JsonRankedItem {
            rank: i + 1,
            id: &item.id,
            title: &item.title,
            description: &item.description,
        })
        .collect();

    print_json(&JsonRankings {
        items,
        complete: rankings.complete,
        comparisons: rankings.comparisons,
    });
}

/// Print a pending pair or the finished ranking.
pub fn print_next(next: &Next) {
    match next {
        Next::Compare { item_a, item_b } => {
            println!("A: {} ({})", item_a.title, item_a.id);
            println!("B: {} ({})", item_b.title, item_b.id);
        }
        Next::Done { sorted } => {
            println!("Ranking complete.\n");
            print_table(sorted);
        }
    }
}

pub fn print_next_json(next: Next) {
    print_json(&NextResponse::from(next));
}
