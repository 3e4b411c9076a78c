//! Register definitions for the SSI PRBS rate generator
//!
//! The block sits on a 32-bit little-endian register bus. Every register is
//! word aligned; the bandwidth and frame counters are 64 bits wide and span
//! two consecutive words (low word first).
//!
//! ## Register Map
//! - **0x00-0x0C**: Control (statistics reset, packet length, period, enable)
//! - **0x10-0x1C**: 32-bit frame statistics (polled)
//! - **0x20-0x47**: 64-bit bandwidth and frame counters (polled)

device_driver::create_device!(
    device_name: RateGen,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        // ==================== CONTROL ====================

        /// STAT_RESET - Statistics reset (0x00)
        /// Toggling bit 0 clears the missed/rate/bandwidth statistics
        register StatReset {
            const ADDRESS = 0x00;
            const SIZE_BITS = 32;

            stat_reset: uint = 0..1,
            reserved_31_1: uint = 1..32,
        },

        /// PACKET_LENGTH - Frames per packet (0x04)
        register PacketLength {
            const ADDRESS = 0x04;
            const SIZE_BITS = 32;

            packet_length: uint = 0..32,
        },

        /// RAW_PERIOD - Clock divider count pacing the generator (0x08)
        /// Frame rate = clock_freq / (raw_period + 1)
        register RawPeriod {
            const ADDRESS = 0x08;
            const SIZE_BITS = 32;

            raw_period: uint = 0..32,
        },

        /// CONTROL - Generator enable and one-shot trigger (0x0C)
        register Control {
            const ADDRESS = 0x0C;
            const SIZE_BITS = 32;

            /// Enable continuous generation
            tx_en: bool = 0,
            /// One-shot burst trigger (edge sensitive)
            one_shot: uint = 1..2,
            reserved_31_2: uint = 2..32,
        },

        // ==================== 32-BIT STATISTICS ====================

        /// MISSED - Missed frame counter (0x10)
        register Missed {
            type Access = RO;
            const ADDRESS = 0x10;
            const SIZE_BITS = 32;

            missed: uint = 0..32,
        },

        /// FRAME_RATE - Instantaneous frame rate in Hz (0x14)
        register FrameRate {
            type Access = RO;
            const ADDRESS = 0x14;
            const SIZE_BITS = 32;

            frame_rate: uint = 0..32,
        },

        /// FRAME_RATE_MAX - Highest observed frame rate (0x18)
        register FrameRateMax {
            type Access = RO;
            const ADDRESS = 0x18;
            const SIZE_BITS = 32;

            frame_rate_max: uint = 0..32,
        },

        /// FRAME_RATE_MIN - Lowest observed frame rate (0x1C)
        register FrameRateMin {
            type Access = RO;
            const ADDRESS = 0x1C;
            const SIZE_BITS = 32;

            frame_rate_min: uint = 0..32,
        },

        // ==================== 64-BIT STATISTICS ====================

        /// BANDWIDTH - Instantaneous throughput (0x20)
        register BandWidth {
            type Access = RO;
            const ADDRESS = 0x20;
            const SIZE_BITS = 64;

            band_width: uint = 0..64,
        },

        /// BANDWIDTH_MAX - Highest observed throughput (0x28)
        register BandWidthMax {
            type Access = RO;
            const ADDRESS = 0x28;
            const SIZE_BITS = 64;

            band_width_max: uint = 0..64,
        },

        /// BANDWIDTH_MIN - Lowest observed throughput (0x30)
        register BandWidthMin {
            type Access = RO;
            const ADDRESS = 0x30;
            const SIZE_BITS = 64;

            band_width_min: uint = 0..64,
        },

        /// FRAME_COUNT - Cumulative frame count (0x40)
        register FrameCount {
            type Access = RO;
            const ADDRESS = 0x40;
            const SIZE_BITS = 64;

            frame_count: uint = 0..64,
        },
    }
);
