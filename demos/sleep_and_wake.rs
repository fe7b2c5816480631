use bm25s3221::*;
use linux_embedded_hal::{Delay, Serial};
use std::time::Duration;

fn main() {
    let path = std::env::args()
        .skip(1)
        .next()
        .expect("Missing path to device");

    println!("Connecting to: {}", path);

    let device = Serial::open(std::path::Path::new(&path)).unwrap();
    let mut sensor = Bm25s3221::from_serial(device, Delay);

    sensor.set_upload_mode(UploadMode::Command).unwrap();
    sensor.sleep().unwrap();
    std::thread::sleep(Duration::from_secs(3));
    sensor.wake_up().unwrap();
    sensor.preheat();

    loop {
        match sensor.query_dust_values() {
            Ok(reading) => println!("{:?}", reading),
            Err(e) => println!("{}", e),
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}
