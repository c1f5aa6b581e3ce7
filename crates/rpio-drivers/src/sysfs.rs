//! GPIO output through the Linux sysfs interface

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rpio_core::{OutputPin, PinError};
use tracing::debug;

/// A GPIO line configured as an output
///
/// The lit flag is cached and only updated after a successful write.
#[derive(Debug)]
pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    lit: bool,
}

impl SysfsPin {
    /// Open a line under `root`, exporting it when needed
    pub fn open_at(root: impl AsRef<Path>, number: u32) -> Result<Self, PinError> {
        let root = root.as_ref().to_path_buf();
        let line = root.join(format!("gpio{number}"));
        let open_err = |source: io::Error| PinError::Open {
            pin: number,
            source,
        };

        if !line.is_dir() {
            debug!(pin = number, "Exporting GPIO line");
            fs::write(root.join("export"), number.to_string()).map_err(open_err)?;
        }

        fs::write(line.join("direction"), "out").map_err(open_err)?;
        let value = fs::read_to_string(line.join("value")).map_err(open_err)?;

        Ok(Self {
            number,
            root,
            lit: value.trim() == "1",
        })
    }

    fn value_path(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.number)).join("value")
    }

    fn write(&mut self, lit: bool) -> Result<(), PinError> {
        fs::write(self.value_path(), if lit { "1" } else { "0" }).map_err(|source| {
            PinError::Write {
                pin: self.number,
                source,
            }
        })?;
        self.lit = lit;
        Ok(())
    }
}

impl OutputPin for SysfsPin {
    fn number(&self) -> u32 {
        self.number
    }

    fn is_lit(&self) -> bool {
        self.lit
    }

    fn on(&mut self) -> Result<(), PinError> {
        self.write(true)
    }

    fn off(&mut self) -> Result<(), PinError> {
        self.write(false)
    }

    fn release(&mut self) -> Result<(), PinError> {
        debug!(pin = self.number, "Unexporting GPIO line");
        fs::write(self.root.join("unexport"), self.number.to_string()).map_err(|source| {
            PinError::Release {
                pin: self.number,
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_line(root: &Path, number: u32, value: &str) {
        let line = root.join(format!("gpio{number}"));
        fs::create_dir_all(&line).unwrap();
        fs::write(line.join("direction"), "in").unwrap();
        fs::write(line.join("value"), value).unwrap();
    }

    fn read(root: &Path, file: &str) -> String {
        fs::read_to_string(root.join(file)).unwrap()
    }

    #[test]
    fn test_open_sets_direction_and_reads_state() {
        let dir = TempDir::new().unwrap();
        fake_line(dir.path(), 17, "1\n");

        let pin = SysfsPin::open_at(dir.path(), 17).unwrap();
        assert_eq!(pin.number(), 17);
        assert!(pin.is_lit());
        assert_eq!(read(dir.path(), "gpio17/direction"), "out");
        assert!(!dir.path().join("export").exists());
    }

    #[test]
    fn test_on_off_write_value() {
        let dir = TempDir::new().unwrap();
        fake_line(dir.path(), 4, "0");

        let mut pin = SysfsPin::open_at(dir.path(), 4).unwrap();
        assert!(!pin.is_lit());

        pin.on().unwrap();
        assert!(pin.is_lit());
        assert_eq!(read(dir.path(), "gpio4/value"), "1");

        pin.off().unwrap();
        assert!(!pin.is_lit());
        assert_eq!(read(dir.path(), "gpio4/value"), "0");
    }

    #[test]
    fn test_release_unexports() {
        let dir = TempDir::new().unwrap();
        fake_line(dir.path(), 22, "0");

        let mut pin = SysfsPin::open_at(dir.path(), 22).unwrap();
        pin.release().unwrap();
        assert_eq!(read(dir.path(), "unexport"), "22");
    }

    #[test]
    fn test_missing_line_fails_to_open() {
        let dir = TempDir::new().unwrap();

        // Export succeeds (plain file) but no kernel creates the line.
        let err = SysfsPin::open_at(dir.path(), 5).unwrap_err();
        assert!(matches!(err, PinError::Open { pin: 5, .. }));
        assert_eq!(read(dir.path(), "export"), "5");
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let dir = TempDir::new().unwrap();
        fake_line(dir.path(), 6, "0");

        let mut pin = SysfsPin::open_at(dir.path(), 6).unwrap();
        fs::remove_dir_all(dir.path().join("gpio6")).unwrap();

        assert!(matches!(pin.on(), Err(PinError::Write { pin: 6, .. })));
        assert!(!pin.is_lit());
    }
}
