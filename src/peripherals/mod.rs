pub mod gpio;
pub mod mode;
pub mod system;
pub mod tick;
pub mod uart;
pub mod usb_phy;
pub mod usb_system;

pub use gpio::{ActiveLevel, Button, Led};
pub use mode::{ActiveMode, BareMetal, BringupMode, Rtos};
pub use system::Board;
pub use tick::{TickClock, SYSTEM_TICKS};
pub use uart::UartTransport;
pub use usb_system::{UsbInterruptBridge, UsbInterruptHandler};
