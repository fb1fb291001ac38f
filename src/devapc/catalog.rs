//! Compiled-in region catalog for the MT8188 APU subsystem.
//!
//! Three regions are configured independently: the always-on control
//! block (`AO`), the remote compute complex (`RCX`) and the RCX network on
//! chip (`NOC`). `RCX` and `NOC` lose their contents when the compute
//! complex powers down and must be reprogrammed after every power-up.

use crate::devapc::{
    error::ConfigError,
    macros::slave_table,
    policy::{MAX_DOMAINS, SlavePolicy},
    table::{
        DomainRegion, RegionConfig, RegionGeometry, RegisterLayout, SlaveDescriptor,
        ViolationLayout,
    },
};

const APUSYS_BASE: usize = 0x1900_0000;

pub const APU_CTRL_DAPC_AO_BASE: usize = APUSYS_BASE + 0x000F_C000;
pub const APU_CTRL_DAPC_RCX_BASE: usize = APUSYS_BASE + 0x0003_0000;
pub const APU_NOC_DAPC_RCX_BASE: usize = APUSYS_BASE + 0x0003_4000;

pub const APU_CTRL_DAPC_AO_SLAVE_NUM: u16 = 30;
pub const APU_CTRL_DAPC_RCX_SLAVE_NUM: u16 = 63;
pub const APU_NOC_DAPC_RCX_SLAVE_NUM: u16 = 5;

const DOMAIN_STRIDE: usize = 0x40;
const ROW_STRIDE: usize = 0x4;

const fn registers(base: usize) -> RegisterLayout {
    RegisterLayout {
        base,
        domain_stride: DOMAIN_STRIDE,
        row_stride: ROW_STRIDE,
    }
}

const fn violation(base: usize) -> ViolationLayout {
    ViolationLayout {
        mask_base: base + 0x400,
        status_base: base + 0x480,
        row_stride: ROW_STRIDE,
        debug0: base + 0x500,
        debug1: base + 0x504,
    }
}

// NoC
pub const SLAVE_MD32_SRAM: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;

// Control
pub const SLAVE_VCORE: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_RPC: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect;
pub const SLAVE_PCU: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_AO_CTRL: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_PLL: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect;
pub const SLAVE_ACC: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_SEC: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_ARE0: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_ARE1: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_ARE2: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_UNKNOWN: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_APU_BULK: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_AO_BCRM: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_AO_DAPC_WRAP: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_AO_DAPC_CON: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_RCX_ACX_BULK: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
pub const SLAVE_ACX0_BCRM: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
pub const SLAVE_RPCTOP_LITE_ACX0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_ACX1_BCRM: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
pub const SLAVE_RPCTOP_LITE_ACX1: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_RCX_TO_ACX0_0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
pub const SLAVE_RCX_TO_ACX0_1: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_SAE_TO_ACX0_0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
pub const SLAVE_SAE_TO_ACX0_1: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_RCX_TO_ACX1_0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_RCX_TO_ACX1_1: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_SAE_TO_ACX1_0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_SAE_TO_ACX1_1: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_MD32_SYSCTRL0: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_MD32_SYSCTRL1: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect;
pub const SLAVE_MD32_WDT: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_MD32_CACHE: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_NOC_AXI: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_MD32_DBG: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_DBG_CRTL: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU0_BANK0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_IOMMU0_BANK1: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU0_BANK2: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU0_BANK3: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU0_BANK4: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU1_BANK0: SlavePolicy = SlavePolicy::ForbidExceptD0D5NoProtect;
pub const SLAVE_IOMMU1_BANK1: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU1_BANK2: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU1_BANK3: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_IOMMU1_BANK4: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_S0_SSC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_N0_SSC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_ACP_SSC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_S1_SSC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_N1_SSC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_CFG: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect;
pub const SLAVE_SEMA_STIMER: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_EMI_CFG: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_LOG: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect;
pub const SLAVE_CPE_SENSOR: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_CPE_COEF: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_CPE_CTRL: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_DFD_REG_SOC: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX0_DLA0: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX0_DLA1: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX0_VPU0: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX1_DLA0: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX1_DLA1: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_SENSOR_WRAP_ACX1_VPU0: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_REVISER: SlavePolicy = SlavePolicy::ForbidExceptD0SecRw;
pub const SLAVE_NOC: SlavePolicy = SlavePolicy::ForbidExceptD0D3SecRwD5NoProtect;
pub const SLAVE_BCRM: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_DAPC_WRAP: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_DAPC_CON: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_NOC_DAPC_WRAP: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_NOC_DAPC_CON: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_NOC_BCRM: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;
pub const SLAVE_ACS: SlavePolicy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
pub const SLAVE_HSE: SlavePolicy = SlavePolicy::ForbidExceptD5NoProtect;

pub const AO_SLAVES: &[SlaveDescriptor] = &slave_table! {
    0 => VCORE,
    1 => RPC,
    2 => PCU,
    3 => AO_CTRL,
    4 => PLL,
    5 => ACC,
    6 => SEC,
    7 => ARE0,
    8 => ARE1,
    9 => ARE2,
    10 => UNKNOWN,
    11 => APU_BULK,
    12 => AO_BCRM,
    13 => AO_DAPC_WRAP,
    14 => AO_DAPC_CON,
    15 => RCX_ACX_BULK,
    16 => UNKNOWN,
    17 => UNKNOWN,
    18 => ACX0_BCRM,
    19 => RPCTOP_LITE_ACX0,
    20 => ACX1_BCRM,
    21 => RPCTOP_LITE_ACX1,
    22 => RCX_TO_ACX0_0,
    23 => RCX_TO_ACX0_1,
    24 => SAE_TO_ACX0_0,
    25 => SAE_TO_ACX0_1,
    26 => RCX_TO_ACX1_0,
    27 => RCX_TO_ACX1_1,
    28 => SAE_TO_ACX1_0,
    29 => SAE_TO_ACX1_1,
};

pub const RCX_SLAVES: &[SlaveDescriptor] = &slave_table! {
    0 => MD32_SYSCTRL0,
    1 => MD32_SYSCTRL1,
    2 => MD32_WDT,
    3 => MD32_CACHE,
    4 => RPC,
    5 => NOC_AXI,
    6 => MD32_DBG,
    7 => DBG_CRTL,
    8 => IOMMU0_BANK0,
    9 => IOMMU0_BANK1,
    10 => IOMMU0_BANK2,
    11 => IOMMU0_BANK3,
    12 => IOMMU0_BANK4,
    13 => IOMMU1_BANK0,
    14 => IOMMU1_BANK1,
    15 => IOMMU1_BANK2,
    16 => IOMMU1_BANK3,
    17 => IOMMU1_BANK4,
    18 => S0_SSC,
    19 => N0_SSC,
    20 => ACP_SSC,
    21 => S1_SSC,
    22 => N1_SSC,
    23 => CFG,
    24 => SEMA_STIMER,
    25 => EMI_CFG,
    26 => LOG,
    27 => CPE_SENSOR,
    28 => CPE_COEF,
    29 => CPE_CTRL,
    30 => UNKNOWN,
    31 => DFD_REG_SOC,
    32 => SENSOR_WRAP_ACX0_DLA0,
    33 => SENSOR_WRAP_ACX0_DLA1,
    34 => SENSOR_WRAP_ACX0_VPU0,
    35 => SENSOR_WRAP_ACX1_DLA0,
    36 => SENSOR_WRAP_ACX1_DLA1,
    37 => SENSOR_WRAP_ACX1_VPU0,
    38 => REVISER,
    39 => NOC,
    40 => BCRM,
    41 => DAPC_WRAP,
    42 => DAPC_CON,
    43 => NOC_DAPC_WRAP,
    44 => NOC_DAPC_CON,
    45 => NOC_BCRM,
    46 => ACS,
    47 => HSE,
    48 => UNKNOWN,
    49 => UNKNOWN,
    50 => UNKNOWN,
    51 => UNKNOWN,
    52 => UNKNOWN,
    53 => UNKNOWN,
    54 => UNKNOWN,
    55 => UNKNOWN,
    56 => UNKNOWN,
    57 => UNKNOWN,
    58 => UNKNOWN,
    59 => UNKNOWN,
    60 => UNKNOWN,
    61 => UNKNOWN,
    62 => UNKNOWN,
};

pub const NOC_SLAVES: &[SlaveDescriptor] = &slave_table! {
    0 => MD32_SRAM,
    1 => MD32_SRAM,
    2 => MD32_SRAM,
    3 => MD32_SRAM,
    4 => MD32_SRAM,
};

pub const AO: RegionConfig = RegionConfig {
    name: "AO",
    geometry: RegionGeometry::standard(APU_CTRL_DAPC_AO_SLAVE_NUM, MAX_DOMAINS as u8),
    registers: registers(APU_CTRL_DAPC_AO_BASE),
    violation: violation(APU_CTRL_DAPC_AO_BASE),
    slaves: AO_SLAVES,
};

pub const RCX: RegionConfig = RegionConfig {
    name: "RCX",
    geometry: RegionGeometry::standard(APU_CTRL_DAPC_RCX_SLAVE_NUM, MAX_DOMAINS as u8),
    registers: registers(APU_CTRL_DAPC_RCX_BASE),
    violation: violation(APU_CTRL_DAPC_RCX_BASE),
    slaves: RCX_SLAVES,
};

pub const NOC: RegionConfig = RegionConfig {
    name: "NOC",
    geometry: RegionGeometry::standard(APU_NOC_DAPC_RCX_SLAVE_NUM, MAX_DOMAINS as u8),
    registers: registers(APU_NOC_DAPC_RCX_BASE),
    violation: violation(APU_NOC_DAPC_RCX_BASE),
    slaves: NOC_SLAVES,
};

/// Every region in boot order.
pub const REGIONS: [&RegionConfig; 3] = [&AO, &RCX, &NOC];

/// Looks up a region by name, ignoring ASCII case, and validates it.
///
/// # Errors
/// * [`ConfigError::UnknownRegion`] - no region has this name
/// * any validation error from [`DomainRegion::build`]
pub fn build(region_name: &str) -> Result<DomainRegion, ConfigError> {
    let config = REGIONS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(region_name))
        .ok_or(ConfigError::UnknownRegion)?;
    DomainRegion::build(config)
}
