use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::sensors::StepCounter;

pub const BMA423_ADDR: u8 = 0x18;
pub const BMA423_CHIP_ID: u8 = 0x13;

const REG_CHIP_ID: u8 = 0x00;
const REG_STEP_COUNTER_0: u8 = 0x1E;
const REG_INTERNAL_STATUS: u8 = 0x2A;
const REG_ACC_CONF: u8 = 0x40;
const REG_INIT_CTRL: u8 = 0x59;
const REG_ASIC_LSB: u8 = 0x5B;
const REG_ASIC_MSB: u8 = 0x5C;
const REG_FEATURES_IN: u8 = 0x5E;
const REG_PWR_CONF: u8 = 0x7C;
const REG_PWR_CTRL: u8 = 0x7D;

/// 100 Hz, normal averaging, continuous filter.
const ACC_CONF_100HZ: u8 = 0xA8;
const PWR_CTRL_ACC_EN: u8 = 0x04;

const INTERNAL_STATUS_MSG_MASK: u8 = 0x1F;
const INTERNAL_STATUS_INIT_OK: u8 = 0x01;
const INIT_POLL_ATTEMPTS: u32 = 20;
const INIT_POLL_INTERVAL_MS: u32 = 10;

/// Bytes per burst into the feature port; the asic address is re-set before each.
const CONFIG_CHUNK: usize = 16;
pub const FEATURE_PAGE_LEN: usize = 64;
/// Step counter settings word inside the feature page; enable is bit 4 of its high byte.
const STEP_CNTR_EN_BYTE: usize = 0x3A + 1;
const STEP_CNTR_EN_MASK: u8 = 0x10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bma423Error<E> {
    Bus(E),
    ChipId(u8),
    /// No feature-engine image was built into the firmware.
    NoFeatureConfig,
    /// INTERNAL_STATUS after loading the image.
    FeatureEngine(u8),
}

impl<E> Bma423Error<E> {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bus(_) => "i2c transfer failed",
            Self::ChipId(_) => "unexpected chip id",
            Self::NoFeatureConfig => "no feature config image",
            Self::FeatureEngine(_) => "feature engine did not start",
        }
    }
}

/// Step counter half of the BMA423. The step detector runs on the chip's
/// feature engine, which has to be loaded with Bosch's config image after
/// every power-on; the counter registers stay at zero until then.
pub struct Bma423<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Bma423<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Loads `feature_config` into the feature engine, powers the
    /// accelerometer and switches the step counter on.
    pub fn init<D: DelayNs>(
        &mut self,
        feature_config: &[u8],
        delay: &mut D,
    ) -> Result<(), Bma423Error<I2C::Error>> {
        let id = self.read_reg(REG_CHIP_ID)?;
        if id != BMA423_CHIP_ID {
            return Err(Bma423Error::ChipId(id));
        }
        if feature_config.is_empty() {
            return Err(Bma423Error::NoFeatureConfig);
        }

        // Advanced power save off; the image upload fails while it is on.
        self.write_reg(REG_PWR_CONF, 0x00)?;
        delay.delay_ms(1);
        self.load_feature_config(feature_config, delay)?;

        self.write_reg(REG_ACC_CONF, ACC_CONF_100HZ)?;
        self.write_reg(REG_PWR_CTRL, PWR_CTRL_ACC_EN)?;
        self.enable_step_counter()
    }

    fn load_feature_config<D: DelayNs>(
        &mut self,
        image: &[u8],
        delay: &mut D,
    ) -> Result<(), Bma423Error<I2C::Error>> {
        self.write_reg(REG_INIT_CTRL, 0x00)?;
        for (chunk_index, chunk) in image.chunks(CONFIG_CHUNK).enumerate() {
            let word = chunk_index * CONFIG_CHUNK / 2;
            self.write_reg(REG_ASIC_LSB, (word & 0x0F) as u8)?;
            self.write_reg(REG_ASIC_MSB, (word >> 4) as u8)?;
            let mut burst = [0u8; CONFIG_CHUNK + 1];
            burst[0] = REG_FEATURES_IN;
            burst[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(BMA423_ADDR, &burst[..=chunk.len()])
                .map_err(Bma423Error::Bus)?;
        }
        self.write_reg(REG_INIT_CTRL, 0x01)?;

        let mut status = 0;
        for _ in 0..INIT_POLL_ATTEMPTS {
            delay.delay_ms(INIT_POLL_INTERVAL_MS);
            status = self.read_reg(REG_INTERNAL_STATUS)? & INTERNAL_STATUS_MSG_MASK;
            if status == INTERNAL_STATUS_INIT_OK {
                log::debug!("bma423: feature engine up image_len={}", image.len());
                return Ok(());
            }
        }
        Err(Bma423Error::FeatureEngine(status))
    }

    fn enable_step_counter(&mut self) -> Result<(), Bma423Error<I2C::Error>> {
        let mut page = [0u8; FEATURE_PAGE_LEN + 1];
        self.i2c
            .write_read(BMA423_ADDR, &[REG_FEATURES_IN], &mut page[1..])
            .map_err(Bma423Error::Bus)?;
        page[0] = REG_FEATURES_IN;
        page[1 + STEP_CNTR_EN_BYTE] |= STEP_CNTR_EN_MASK;
        self.i2c.write(BMA423_ADDR, &page).map_err(Bma423Error::Bus)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Bma423Error<I2C::Error>> {
        let mut byte = [0u8; 1];
        self.i2c
            .write_read(BMA423_ADDR, &[reg], &mut byte)
            .map_err(Bma423Error::Bus)?;
        Ok(byte[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Bma423Error<I2C::Error>> {
        self.i2c
            .write(BMA423_ADDR, &[reg, value])
            .map_err(Bma423Error::Bus)
    }
}

impl<I2C: I2c> StepCounter for Bma423<I2C> {
    type Error = Bma423Error<I2C::Error>;

    fn raw_steps(&mut self) -> Result<u32, Self::Error> {
        let mut bytes = [0u8; 4];
        self.i2c
            .write_read(BMA423_ADDR, &[REG_STEP_COUNTER_0], &mut bytes)
            .map_err(Bma423Error::Bus)?;
        Ok(u32::from_le_bytes(bytes))
    }
}
