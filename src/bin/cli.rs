use chrono::NaiveDate;
use pert_tool::{
    Project, load_project_from_csv, load_project_from_json, save_project_to_csv,
    save_project_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};

fn parse_pred_list(s: &str) -> Vec<i32> {
    s.split(',')
        .filter_map(|p| p.trim().parse::<i32>().ok())
        .collect()
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let render_value = |col_name: &str, av: &AnyValue| -> String {
        match av {
            AnyValue::Null => String::new(),
            AnyValue::Int32(v) => v.to_string(),
            AnyValue::Int64(v) => v.to_string(),
            AnyValue::Boolean(v) => v.to_string(),
            AnyValue::String(s) => s.to_string(),
            AnyValue::List(inner) if col_name == "predecessors" || col_name == "successors" => {
                if let Ok(ca) = inner.i32() {
                    ca.into_iter()
                        .flatten()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                } else {
                    av.to_string()
                }
            }
            _ => av.to_string(),
        }
    };

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = render_value(col.name(), av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = render_value(col.name(), av);
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the project table\n  add <id> <name> <duration> [preds_csv]\n                                     Upsert a task (preds like 1,2,3)\n  delete <id>                        Delete a task and clean up dependencies\n  compute                            Recompute dates (forward + backward passes)\n  dates                              Report earliest/latest dates per task\n  critical                           Show the critical path\n  duration                           Show total project duration\n  workers <n>                        Set the session worker count (>= 1)\n  simulate [n]                       Duration with n workers (default: session count)\n  meta show                          Show project metadata\n  meta name <text...>                Update project name\n  meta desc <text...>                Update project description\n  meta start <YYYY-MM-DD|none>       Set or clear the project start date\n  save <json|csv> <path>             Persist project to disk\n  load <json|csv> <path>             Load project from disk\n  quit|exit                          Exit"
    );
}

fn print_metadata(project: &Project) {
    let metadata = project.metadata();
    println!("Project name       : {}", metadata.project_name);
    println!("Project description: {}", metadata.project_description);
    match metadata.project_start_date {
        Some(date) => println!("Project start date : {}", date),
        None => println!("Project start date : unset"),
    }
}

fn print_dates_report(project: &Project) {
    let tasks = match project.tasks() {
        Ok(tasks) => tasks,
        Err(e) => {
            println!("Error reading tasks: {}", e);
            return;
        }
    };
    println!("# name, earliest date, latest date");
    for task in tasks {
        let earliest = task
            .earliest_date
            .map(|v| v.to_string())
            .unwrap_or_default();
        let latest = task.latest_date.map(|v| v.to_string()).unwrap_or_default();
        println!("{}, {}, {}", task.name, earliest, latest);
    }
}

fn print_critical_path(project: &Project) {
    let tasks = match project.tasks() {
        Ok(tasks) => tasks,
        Err(e) => {
            println!("Error reading tasks: {}", e);
            return;
        }
    };
    let names: Vec<String> = tasks
        .iter()
        .filter(|t| t.is_critical == Some(true))
        .map(|t| t.name.clone())
        .collect();
    if names.is_empty() {
        println!("No critical path (project is empty).");
    } else {
        println!("{}", names.join(" --> "));
    }
}

fn main() {
    let mut project = Project::new();
    // Session worker count, menu-style; the library itself holds no such state.
    let mut worker_count: Option<usize> = None;

    println!("PERT Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        if line.is_empty() {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_df_as_text_table(project.dataframe()));
            }
            "add" => {
                let id_s = parts.next();
                let name_s = parts.next();
                let dur_s = parts.next();
                let preds_s = parts.next();
                match (id_s, name_s, dur_s) {
                    (Some(id_s), Some(name), Some(dur_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let duration: i64 = match dur_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid duration");
                                continue;
                            }
                        };
                        let preds = preds_s.map(parse_pred_list);
                        match project.upsert_task(id, name, duration, preds) {
                            Ok(_) => {
                                println!("Task upserted.");
                                println!("{}", render_df_as_text_table(project.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => {
                        println!("Usage: add <id> <name> <duration> [preds_csv]");
                    }
                }
            }
            "delete" => {
                let id_s = parts.next();
                match id_s {
                    Some(id_s) => match id_s.parse::<i32>() {
                        Ok(id) => match project.delete_task(id) {
                            Ok(true) => {
                                println!("Deleted task {id}.");
                                println!("{}", render_df_as_text_table(project.dataframe()));
                            }
                            Ok(false) => println!("Task {id} not found."),
                            Err(e) => println!("Error deleting task: {}", e),
                        },
                        Err(_) => println!("Invalid id"),
                    },
                    None => println!("Usage: delete <id>"),
                }
            }
            "compute" => match project.compute() {
                Ok(summary) => {
                    println!(
                        "Computed ({})\n{}",
                        summary.to_cli_summary(),
                        render_df_as_text_table(project.dataframe())
                    );
                }
                Err(e) => println!("Compute error: {}", e),
            },
            "dates" => match project.compute() {
                Ok(_) => print_dates_report(&project),
                Err(e) => println!("Compute error: {}", e),
            },
            "critical" => match project.compute() {
                Ok(_) => print_critical_path(&project),
                Err(e) => println!("Compute error: {}", e),
            },
            "duration" => match project.compute() {
                Ok(summary) => {
                    println!("Total duration: {}", summary.total_duration);
                    if let Some(finish) = project.date_for_offset(summary.total_duration) {
                        println!("Projected finish: {}", finish);
                    }
                }
                Err(e) => println!("Compute error: {}", e),
            },
            "workers" => {
                let count_s = parts.next();
                match count_s.and_then(|s| s.parse::<usize>().ok()) {
                    Some(count) if count >= 1 => {
                        worker_count = Some(count);
                        println!("{} workers now available.", count);
                    }
                    _ => println!("Usage: workers <n>  (n >= 1)"),
                }
            }
            "simulate" => {
                let explicit = parts.next().and_then(|s| s.parse::<usize>().ok());
                let count = match explicit.or(worker_count) {
                    Some(count) => count,
                    None => {
                        println!("Set the number of workers first with 'workers <n>'.");
                        continue;
                    }
                };
                match project.simulate(count) {
                    Ok(duration) => println!("Duration with {} workers: {}", count, duration),
                    Err(e) => println!("Simulation error: {}", e),
                }
            }
            "meta" => match parts.next() {
                Some("show") | None => print_metadata(&project),
                Some("name") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta name <text...>");
                        continue;
                    }
                    let name = rest.join(" ");
                    project.set_project_name(name);
                    println!("Project name updated.");
                    print_metadata(&project);
                }
                Some("desc") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta desc <text...>");
                        continue;
                    }
                    let desc = rest.join(" ");
                    project.set_project_description(desc);
                    println!("Project description updated.");
                    print_metadata(&project);
                }
                Some("start") => match parts.next() {
                    Some("none") => {
                        project.set_project_start_date(None);
                        println!("Project start date cleared.");
                        print_metadata(&project);
                    }
                    Some(date_s) => match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                        Ok(date) => {
                            project.set_project_start_date(Some(date));
                            println!("Project start date updated.");
                            print_metadata(&project);
                        }
                        Err(_) => println!("Invalid date (YYYY-MM-DD)"),
                    },
                    None => println!("Usage: meta start <YYYY-MM-DD|none>"),
                },
                Some(other) => {
                    println!("Unknown meta command '{}'.", other);
                    println!("Usage: meta show|name|desc|start ...");
                }
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match save_project_to_json(&project, path) {
                        Ok(_) => println!("Project saved to {}.", path),
                        Err(e) => println!("Error saving project: {}", e),
                    },
                    (Some("csv"), Some(path)) => match save_project_to_csv(&project, path) {
                        Ok(_) => println!("Project saved to {}.", path),
                        Err(e) => println!("Error saving project: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match load_project_from_json(path) {
                        Ok(loaded) => {
                            project = loaded;
                            println!("Project loaded from {}.", path);
                            println!("{}", render_df_as_text_table(project.dataframe()));
                        }
                        Err(e) => println!("Error loading project: {}", e),
                    },
                    (Some("csv"), Some(path)) => match load_project_from_csv(path) {
                        Ok(loaded) => {
                            project = loaded;
                            println!("Project loaded from {}.", path);
                            println!("{}", render_df_as_text_table(project.dataframe()));
                        }
                        Err(e) => println!("Error loading project: {}", e),
                    },
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
