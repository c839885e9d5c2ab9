use clap::{Parser, Subcommand};
use hko_core::{
    Config, Coordinate, Envelope, Lang, Payload, Status, WeatherService,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "hko", version, about = "Hong Kong Observatory weather feeds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current weather for the grid cell nearest to a coordinate.
    Local {
        latitude: f64,
        longitude: f64,
    },

    /// Two-hour rainfall nowcast for the grid cell nearest to a coordinate.
    Rainfall {
        latitude: f64,
        longitude: f64,
    },

    /// Today's maximum UV index forecast.
    Uv {
        /// Language variant: "uc" or "en".
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Weather warnings currently in force.
    Warning {
        /// Language variant: "uc" or "en".
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Multi-day weather forecast.
    Forecast {
        /// Language variant: "uc" or "en".
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let service = WeatherService::new(&config)?;

        match self.command {
            Command::Local { latitude, longitude } => {
                let envelope = service
                    .local_weather(Coordinate::new(latitude, longitude))
                    .await;
                print_status(&envelope);
                if let Some(place) = &envelope.place {
                    println!("place: {place}");
                }
                if let Some(weather) = envelope.data() {
                    println!(
                        "temperature: {}{}",
                        weather.temperature.value, weather.temperature.unit
                    );
                    println!(
                        "relative humidity: {}{}",
                        weather.humidity.value, weather.humidity.unit
                    );
                    println!(
                        "wind: {} ({}) {} km/h",
                        weather.wind.direction, weather.wind.direction_code, weather.wind.speed
                    );
                }
            }
            Command::Rainfall { latitude, longitude } => {
                let envelope = service
                    .rainfall_nowcast(Coordinate::new(latitude, longitude))
                    .await;
                print_status(&envelope);
                if let Some(nowcast) = envelope.data() {
                    for (i, window) in nowcast.windows.iter().enumerate() {
                        println!(
                            "{}-{} min ({} to {}): {} mm",
                            i * 30,
                            (i + 1) * 30,
                            window.from_time,
                            window.to_time,
                            window.value
                        );
                    }
                    println!("{}", nowcast.description_en);
                    println!("{}", nowcast.description_tc);
                }
            }
            Command::Uv { lang } => {
                let envelope = service.uv_index(Lang::try_from(lang.as_str())?).await;
                print_status(&envelope);
                match &envelope.payload {
                    Payload::Data(report) => {
                        println!("date: {}", report.date);
                        println!("max UV index: {}", report.max_uv_index);
                        println!("intensity: {}", report.intensity);
                    }
                    Payload::Raw(raw) => println!("{raw}"),
                    Payload::Empty => {}
                }
            }
            Command::Warning { lang } => {
                let envelope = service.weather_warning(Lang::try_from(lang.as_str())?).await;
                print_status(&envelope);
                if let Some(summary) = envelope.data() {
                    println!("{}", serde_json::to_string_pretty(&summary.0)?);
                }
            }
            Command::Forecast { lang } => {
                let envelope = service.forecast(Lang::try_from(lang.as_str())?).await;
                print_status(&envelope);
                if let Some(forecast) = envelope.data() {
                    if let Some(situation) = &forecast.general_situation {
                        println!("{situation}");
                    }
                    for day in &forecast.days {
                        println!(
                            "{}: {}-{}C, RH {}-{}%, {} {}",
                            day.date,
                            day.min_temp,
                            day.max_temp,
                            day.min_rh,
                            day.max_rh,
                            day.weather,
                            day.wind
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

fn print_status<T>(envelope: &Envelope<T>) {
    println!("status: {} ({})", envelope.status, envelope.status.code());
    if !envelope.is_success() && envelope.status != Status::PartialSuccess {
        println!("no usable data for this call");
    }
}
