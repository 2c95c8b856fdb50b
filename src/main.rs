use std::{error::Error, sync::Arc};

use clap::{Parser, Subcommand};
use eframe::{egui::ViewportBuilder, run_native};
use simple_alarm::{
    alarm::parse_time,
    config::Config,
    store::{AlarmStore, TomlAlarmStore},
    AlarmApp,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
}
#[derive(Subcommand)]
enum Command {
    /// write the default config
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// add an alarm, time as HH:MM
    NewAlarm {
        time: String,
        #[clap(long, short)]
        repeating: bool,
    },
    /// print every stored alarm
    List,
}

fn main() -> Result<(), Box<dyn Error>> {
    // initilize the logger
    simple_file_logger::init_logger!("simple_alarm").expect("couldn't initialize logger");

    let args = Args::parse();
    let store = Arc::new(TomlAlarmStore::new(Config::alarms_path()?));
    match args.command {
        Some(Command::Init { force }) => {
            if force || !Config::is_config_present()? {
                Config::new().save(Config::config_path()?)?;
                log::info!("wrote default config");
            }
            return Ok(());
        }
        Some(Command::NewAlarm { time, repeating }) => {
            let alarm = store.insert(parse_time(&time)?, repeating)?;
            println!("{alarm}");
            return Ok(());
        }
        Some(Command::List) => {
            for alarm in store.load_all()? {
                println!("{alarm}");
            }
            return Ok(());
        }
        None => {}
    }

    let config = Config::load_or_default()?;
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([320.0, 420.0]),
        ..Default::default()
    };
    // run the gui
    run_native(
        "Simple Alarm",
        native_options,
        Box::new(move |_| Ok(Box::new(AlarmApp::new(config, store)))),
    )
    .map_err(|e| e.into())
}
