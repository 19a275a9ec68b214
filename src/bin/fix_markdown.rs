use clap::Parser;
use std::path::PathBuf;
use stonewalker::tools::markdown_fix::fix_tree;
use stonewalker::utils::logger;

#[derive(Debug, Parser)]
#[command(name = "fix-markdown")]
#[command(about = "Undo over-escaped markdown (admonitions, task lists, \\& and \\_)")]
struct Args {
    #[arg(default_value = ".")]
    root: PathBuf,

    #[arg(long, help = "Only report files that need fixing; exit 1 if any do")]
    check: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match fix_tree(&args.root, args.check) {
        Ok(report) => {
            println!(
                "🔧 Checked markdown formatting in {} files under {}",
                report.scanned,
                args.root.display()
            );
            for file in &report.fixed {
                if args.check {
                    println!("  ✗ Needs fixing: {}", file.display());
                } else {
                    println!("  ✓ Fixed: {}", file.display());
                }
            }

            if args.check && !report.fixed.is_empty() {
                std::process::exit(1);
            }
            println!("🎉 Markdown formatting fix complete!");
        }
        Err(e) => {
            tracing::error!("❌ Error fixing markdown formatting: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}
