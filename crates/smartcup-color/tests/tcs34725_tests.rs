//! Integration tests for the TCS34725 driver against a scripted register file.

use embassy_futures::block_on;
use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use smartcup_color::{
    ColorSensor, IntegrationTime, RawChannels, TCS34725_ADDRESS, Tcs34725, Tcs34725Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BusFault;

impl embedded_hal::i2c::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Register file behind the TCS34725 command protocol
#[derive(Default)]
struct FakeBus {
    registers: [u8; 0x20],
    pointer: usize,
    auto_increment: bool,
    interrupt_clears: usize,
    enable_writes: Vec<u8>,
    fail: bool,
}

impl FakeBus {
    fn with_id(id: u8) -> Self {
        let mut bus = Self::default();
        bus.registers[0x12] = id;
        bus
    }

    fn command(&mut self, command: u8) {
        assert_eq!(command & 0x80, 0x80, "command bit missing: {command:#04x}");
        if command == 0xE6 {
            self.interrupt_clears += 1;
            return;
        }
        self.pointer = usize::from(command & 0x1F);
        self.auto_increment = command & 0x60 == 0x20;
    }

    fn advance(&mut self) {
        if self.auto_increment {
            self.pointer += 1;
        }
    }
}

impl ErrorType for FakeBus {
    type Error = BusFault;
}

impl I2c for FakeBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, TCS34725_ADDRESS);
        if self.fail {
            return Err(BusFault);
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let (command, data) = bytes.split_first().expect("empty write");
                    self.command(*command);
                    for byte in data {
                        if self.pointer == 0x00 {
                            self.enable_writes.push(*byte);
                        }
                        self.registers[self.pointer] = *byte;
                        self.advance();
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer];
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

fn sensor(bus: FakeBus) -> Tcs34725<FakeBus, NoDelay> {
    Tcs34725::new(bus, NoDelay)
}

#[test]
fn init_programs_timing_and_powers_up() {
    let mut tcs = sensor(FakeBus::with_id(0x44));
    block_on(tcs.init()).unwrap();

    let (bus, _) = tcs.release();
    assert_eq!(bus.registers[0x01], 0xC0); // 154 ms
    assert_eq!(bus.registers[0x0F], 0x01); // 4x gain
    assert_eq!(bus.registers[0x0C], 0x00);
    assert_eq!(bus.enable_writes, vec![0x01, 0x03]);
}

#[test]
fn init_accepts_whole_family() {
    for id in [0x44, 0x4D, 0x10] {
        let mut tcs = sensor(FakeBus::with_id(id));
        assert!(block_on(tcs.init()).is_ok(), "id {id:#04x}");
    }
}

#[test]
fn init_rejects_unknown_id() {
    let mut tcs = sensor(FakeBus::with_id(0x00));
    assert_eq!(block_on(tcs.init()), Err(Tcs34725Error::InvalidId(0x00)));
}

#[test]
fn read_raw_decodes_burst() {
    let mut bus = FakeBus::default();
    bus.registers[0x14..0x1C].copy_from_slice(&[0xBC, 0x01, 0x76, 0x00, 0xB4, 0x00, 0xCB, 0x00]);
    let mut tcs = sensor(bus);

    let channels = block_on(tcs.read_raw()).unwrap();
    assert_eq!(channels, RawChannels::new(0x76, 0xB4, 0xCB, 0x1BC));
}

#[test]
fn interrupt_enable_is_read_modify_write() {
    let mut bus = FakeBus::default();
    bus.registers[0x00] = 0x03;
    let mut tcs = sensor(bus);

    block_on(tcs.set_interrupt(true)).unwrap();
    block_on(tcs.set_interrupt(false)).unwrap();

    let (bus, _) = tcs.release();
    assert_eq!(bus.enable_writes, vec![0x13, 0x03]);
}

#[test]
fn disable_keeps_interrupt_bit() {
    let mut bus = FakeBus::default();
    bus.registers[0x00] = 0x13;
    let mut tcs = sensor(bus);

    block_on(tcs.disable()).unwrap();
    block_on(tcs.enable()).unwrap();

    let (bus, _) = tcs.release();
    assert_eq!(bus.enable_writes, vec![0x10, 0x11, 0x13]);
}

#[test]
fn clear_interrupt_uses_special_function() {
    let mut tcs = sensor(FakeBus::default());
    block_on(tcs.clear_interrupt()).unwrap();
    block_on(tcs.clear_interrupt()).unwrap();

    let (bus, _) = tcs.release();
    assert_eq!(bus.interrupt_clears, 2);
}

#[test]
fn interrupt_limits_cover_full_range() {
    let mut bus = FakeBus::default();
    bus.registers[0x04..0x08].copy_from_slice(&[0xAA; 4]);
    let mut tcs = sensor(bus);

    block_on(tcs.set_interrupt_limits(0, u16::MAX)).unwrap();

    let (bus, _) = tcs.release();
    assert_eq!(bus.registers[0x04..0x08], [0x00, 0x00, 0xFF, 0xFF]);
}

#[test]
fn bus_errors_are_reported() {
    let bus = FakeBus {
        fail: true,
        ..FakeBus::default()
    };
    let mut tcs = sensor(bus);
    assert_eq!(block_on(tcs.read_raw()), Err(Tcs34725Error::Bus(BusFault)));
}

#[test]
fn integration_time_lengths() {
    assert_eq!(IntegrationTime::Ms2_4.millis(), 3);
    assert_eq!(IntegrationTime::Ms50.millis(), 51);
    assert_eq!(IntegrationTime::Ms154.millis(), 154);
    assert_eq!(IntegrationTime::Ms614.millis(), 615);
}
