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

    sensor.set_upload_mode(UploadMode::Auto).unwrap();

    loop {
        if sensor.is_info_available().unwrap() {
            let packet = sensor.read_info_packet();
            match TelemetryFrame::from_bytes(&packet) {
                Ok(frame) => println!("{:?}", frame),
                Err(e) => println!("{:?}", e),
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
