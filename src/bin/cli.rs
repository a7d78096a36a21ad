use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use worldgraph::PathSettings;

/// Генератор графа мира из ASCII-шаблона
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Сгенерировать мир и выгрузить его в файлы
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Каталог библиотеки: от него разрешаются относительные пути
    #[arg(long)]
    lib_dir: Option<PathBuf>,

    /// ASCII-шаблон карты
    #[arg(long)]
    map: Option<PathBuf>,

    /// Авторские города (TOML)
    #[arg(long)]
    city: Option<PathBuf>,

    /// Настройки кластеров суши (TOML)
    #[arg(long)]
    land: Option<PathBuf>,

    /// Ручные провинции (TOML)
    #[arg(long)]
    region: Option<PathBuf>,

    /// Выход: континенты (JSON)
    #[arg(long)]
    continent: Option<PathBuf>,

    /// Выход: врата (JSON)
    #[arg(long)]
    gate: Option<PathBuf>,

    /// Выход: провинции и особые места (JSON)
    #[arg(long)]
    loc: Option<PathBuf>,

    /// Выход: дороги (JSON)
    #[arg(long)]
    road: Option<PathBuf>,

    /// Файл сида: читается в начале, перезаписывается в конце
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Выход: текстовый дамп карты (по умолчанию map-dump.txt в каталоге библиотеки)
    #[arg(long)]
    dump: Option<PathBuf>,
}

impl From<GenerateArgs> for PathSettings {
    fn from(args: GenerateArgs) -> Self {
        Self {
            lib_dir: args.lib_dir,
            map: args.map,
            city: args.city,
            land: args.land,
            region: args.region,
            continent: args.continent,
            gate: args.gate,
            location: args.loc,
            road: args.road,
            seed: args.seed,
            dump: args.dump,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => PathSettings::from(args)
            .resolve()
            .and_then(|paths| worldgraph::run(&paths)),
    };

    match result {
        Ok(_) => {
            log::info!("Готово!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
