use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use thermometer::{Thermometer, ThermometerCommand, ThermometerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("thermometer=debug").init();

    let config = ThermometerConfig::builder()
        .title("Wandering thermometer".to_string())
        .range((-40, 50))
        .build();
    let mut thermometer = Thermometer::new(config)?;

    // Pick a new target every couple of seconds
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let target = rng.random_range(-40.0..50.0);
            if sender.send(ThermometerCommand::Seek(target)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(rng.random_range(800..3000)));
        }
    });

    println!("Displaying a thermometer chasing random temperatures.");
    println!("Drag the slider or use the arrow keys to steer it yourself.");
    thermometer.show_with_commands(receiver)?;
    Ok(())
}
