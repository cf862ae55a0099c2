use licensor_license::{DeviceInfo, MachineId, MIN_MACHINE_ID_LEN};

#[test]
fn device_info_collection() {
    let info = DeviceInfo::collect();
    assert!(!info.os_name.is_empty());
    assert!(!info.arch.is_empty());
    assert!(!info.hostname.is_empty());
}

#[test]
fn device_info_serde() {
    let info = DeviceInfo::collect();
    let json = serde_json::to_string(&info).unwrap();
    let parsed: DeviceInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.os_name, info.os_name);
    assert_eq!(parsed.arch, info.arch);
}

#[test]
fn current_machine_id_is_valid() {
    let id = MachineId::current().unwrap();
    assert_eq!(id.as_str().len(), 64);
    assert!(id.as_str().len() >= MIN_MACHINE_ID_LEN);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
}

#[test]
fn current_machine_id_is_stable() {
    let a = MachineId::current().unwrap();
    let b = MachineId::current().unwrap();
    assert_eq!(a, b);
}

#[test]
fn current_machine_id_reparses_to_itself() {
    let id = MachineId::current().unwrap();
    assert_eq!(MachineId::parse(id.as_str()).unwrap(), id);
    assert!(id.matches(&id.as_str().to_lowercase()));
}

#[test]
fn machine_id_serde_validates() {
    let id: MachineId = serde_json::from_str(r#""abc12345""#).unwrap();
    assert_eq!(id.as_str(), "ABC12345");
    assert!(serde_json::from_str::<MachineId>(r#""short""#).is_err());
}
