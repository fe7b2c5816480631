use bm25s3221::pwm::{Pm25Pwm, PolledPulseIn};
use bm25s3221::*;
use linux_embedded_hal::{Delay, Pin, Serial};

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().expect("Missing path to device");
    let status_pin = args.next().map(|n| n.parse::<u64>().expect("Invalid pin number"));

    println!("Connecting to: {}", path);

    let device = Serial::open(std::path::Path::new(&path)).unwrap();
    let mut sensor = Bm25s3221::from_serial(device, Delay);

    sensor.set_upload_mode(UploadMode::Command).unwrap();
    println!("{:?}", sensor.query_dust_values());

    if let Some(number) = status_pin {
        // the pin has to be exported as an input beforehand
        let pin = Pin::new(number);
        let mut pwm = Pm25Pwm::new(PolledPulseIn::new(pin, Delay, 100));
        println!("PWM PM2.5: {:?}", pwm.read_pm25_value());
    }
}
