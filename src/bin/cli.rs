use clap::{Parser, Subcommand};
use shule::cli::{DraftChoices, derive_draft};
use shule::shule_structure::catalog;
use shule_models::{Band, CurriculumSystem, LevelFlag, Pathway, SchoolType};

#[derive(Parser)]
#[command(name = "shule-cli")]
#[command(about = "Shule CLI - Explore the grade catalog and dry-run school structures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print catalog entries as JSON
    Catalog {
        /// Curriculum system: CBC, 8-4-4 or Both
        #[arg(short = 'c', long)]
        curriculum: Option<CurriculumSystem>,

        /// Band, e.g. primary or junior_secondary
        #[arg(short = 'b', long)]
        band: Option<Band>,
    },
    /// Apply choices to a fresh draft and print the resulting structure as JSON
    Derive {
        /// School type: primary, secondary or mixed
        #[arg(short = 't', long)]
        school_type: Option<SchoolType>,

        /// Primary curriculum (only editable while no school type is chosen)
        #[arg(long)]
        primary: Option<CurriculumSystem>,

        /// Secondary curriculum (secondary and mixed schools)
        #[arg(long)]
        secondary: Option<CurriculumSystem>,

        /// Level flags to switch on, comma separated, e.g. has_primary,has_secondary
        #[arg(short = 'l', long, value_delimiter = ',')]
        levels: Vec<LevelFlag>,

        /// Grade codes to untick after the levels are on
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Senior secondary pathways to select
        #[arg(short = 'p', long, value_delimiter = ',')]
        pathways: Vec<Pathway>,

        /// Enable streams before any level is chosen
        #[arg(long)]
        streams: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Catalog { curriculum, band } => {
            serde_json::to_string_pretty(&catalog::search(curriculum, band))
        }
        Commands::Derive {
            school_type,
            primary,
            secondary,
            levels,
            exclude,
            pathways,
            streams,
        } => {
            let choices = DraftChoices {
                school_type,
                primary_curriculum: primary,
                secondary_curriculum: secondary,
                streams,
                levels,
                excluded_grades: exclude,
                pathways,
            };
            match derive_draft(&choices) {
                Ok(report) => serde_json::to_string_pretty(&report),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to render output: {}", e);
            std::process::exit(1);
        }
    }
}
