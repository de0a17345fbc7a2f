use weather_core::{City, WeatherReport};

pub fn print_report(report: &WeatherReport) {
    let now = &report.current_weather;
    println!("{} ({})", now.city, now.date);
    println!(
        "  {:.1}°F, {} [{}], wind {:.1} mph, humidity {}%",
        now.temperature_f, now.description, now.icon, now.wind_speed_mph, now.humidity_percent
    );

    if report.forecast.is_empty() {
        return;
    }

    println!();
    println!("Forecast:");
    for day in &report.forecast {
        println!(
            "  {:<10} {:>6.1}°F  {:<20} wind {:>4.1} mph  humidity {:>3}%",
            day.date, day.temperature_f, day.description, day.wind_speed_mph, day.humidity_percent
        );
    }
}

pub fn print_history(cities: &[City]) {
    if cities.is_empty() {
        println!("No cities searched yet.");
        return;
    }
    for city in cities {
        println!("{:>4}  {}", city.id, city.name);
    }
}
