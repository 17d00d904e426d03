use chrono::Local;
use chrono::TimeZone;
use fgsniffer::Config;
use fgsniffer::Destination;
use fgsniffer::Pipeline;
use fgsniffer::pcap::FILE_HEADER_LEN;
use fgsniffer::pcap::FileHeader;
use fgsniffer::pcap::Pcap;
use fgsniffer::pcap::RECORD_HEADER_LEN;
use std::fs;
use std::path::Path;

// diagnose sniffer packet any 'icmp' 6 0 a
const VERBOSE_DUMP: &str = "interfaces=[any]
filters=[icmp]
2024-01-15 14:23:45.123456 port1 in 10.0.0.1 -> 10.0.0.2: icmp: echo request
0x0000\t 0009 0f09 0004 0050 5694 2ef4 0800 4500\t.......PV.....E.
0x0010\t 0054 1f3c 4000 4001 0770 0a00 0001 0a00\t.T.<@.@..p......
0x0020\t 0002\t..
2024-01-15 14:23:45.123999 port2 out 10.0.0.1 -> 10.0.0.2: icmp: echo request
0x0000\t 0050 5694 2ef4 0009 0f09 0004 0800 4500\t.PV...........E.
2024-01-15 14:23:45.124500 port1 in 10.0.0.1 -> 10.0.0.2: icmp: echo request
0x0000\t 0009 0f09 0004 0050 5694 2ef4 0800 4501\t.......PV.....E.
2024-01-15 14:23:45.125000 root -- 127.0.0.1 -> 127.0.0.1: icmp: echo reply
0x0000\t 0000 0000 0000 0000 0000 0000 0800 4500\t..............E.

4 packets received by filter
0 packets dropped by kernel
";

fn config_in(dir: &Path, filter: Option<&str>) -> Config {
    let start = Local.with_ymd_and_hms(2024, 1, 15, 14, 23, 0).unwrap();
    let mut config = Config::new(start);
    config.output_dir(dir);
    config.filter(filter.map(String::from));
    config.passthrough(Destination::File(dir.join("stdout.pcap")));
    config
}

fn summary_of(pipeline: &Pipeline, dir: &Path) -> Vec<(String, usize)> {
    let prefix = format!("{}/", dir.display());
    pipeline
        .registry()
        .summary()
        .into_iter()
        .map(|(name, n)| (name.trim_start_matches(&prefix).to_string(), n))
        .collect()
}

#[test]
fn single_packet_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), None));
    pipeline
        .run("2024-01-15 14:23:45.000010 10.0.0.1 -> 10.0.0.2: icmp\n0xabc0 deadbeef\n".as_bytes())
        .unwrap();

    assert_eq!(
        summary_of(&pipeline, dir.path()),
        vec![(String::from("fgs20240115-1423.pcap"), 1)]
    );

    let bytes = fs::read(dir.path().join("fgs20240115-1423.pcap")).unwrap();
    assert_eq!(bytes.len(), FILE_HEADER_LEN + RECORD_HEADER_LEN + 4);
    assert_eq!(
        &bytes[..FILE_HEADER_LEN],
        FileHeader::default().to_bytes().unwrap().as_slice()
    );
    let record = &bytes[FILE_HEADER_LEN..];
    assert_eq!(&record[0..4], &1705328625u32.to_le_bytes());
    assert_eq!(&record[4..8], &10u32.to_le_bytes());
    assert_eq!(&record[8..12], &4u32.to_le_bytes());
    assert_eq!(&record[12..16], &4u32.to_le_bytes());
    assert_eq!(&record[16..], &[0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn verbose_dump_split_per_port() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), None));
    pipeline.run(VERBOSE_DUMP.as_bytes()).unwrap();

    assert_eq!(
        summary_of(&pipeline, dir.path()),
        vec![
            (String::from("fgs20240115-1423----root.pcap"), 1),
            (String::from("fgs20240115-1423-in-port1.pcap"), 2),
            (String::from("fgs20240115-1423-out-port2.pcap"), 1),
        ]
    );

    let port1 = Pcap::read_all(dir.path().join("fgs20240115-1423-in-port1.pcap")).unwrap();
    assert_eq!(port1.header, FileHeader::default());
    assert_eq!(port1.records.len(), 2);
    assert_eq!(port1.records[0].captured_packet_length, 34);
    assert_eq!(port1.records[0].original_packet_length, 34);
    assert_eq!(port1.records[0].ts_subsec, 123456);
    assert_eq!(port1.records[1].ts_subsec, 124500);
    assert_eq!(port1.records[1].packet_data.last(), Some(&0x01));
    // nothing goes to the pass-through without a filter
    assert!(!dir.path().join("stdout.pcap").exists());
}

#[test]
fn passthrough_any() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), Some("any")));
    pipeline.run(VERBOSE_DUMP.as_bytes()).unwrap();

    let pass = Pcap::read_all(dir.path().join("stdout.pcap")).unwrap();
    assert_eq!(pass.records.len(), 4);
}

#[test]
fn passthrough_port_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), Some("port2")));
    pipeline.run(VERBOSE_DUMP.as_bytes()).unwrap();

    // port2 itself plus the `--` packet
    let pass = Pcap::read_all(dir.path().join("stdout.pcap")).unwrap();
    assert_eq!(pass.records.len(), 2);
    assert_eq!(pass.records[0].ts_subsec, 123999);
    assert_eq!(pass.records[1].ts_subsec, 125000);
}

#[test]
fn passthrough_direction_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), Some("in")));
    pipeline.run(VERBOSE_DUMP.as_bytes()).unwrap();

    let pass = Pcap::read_all(dir.path().join("stdout.pcap")).unwrap();
    assert_eq!(pass.records.len(), 3);
}

#[test]
fn unsafe_port_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), None));
    let input = "0.100 vlan/10?x in 10.0.0.1 -> 10.0.0.2: udp\n0x0000 0102\n";
    pipeline.run(input.as_bytes()).unwrap();

    assert!(dir.path().join("fgs20240115-1423-in-vlan_10_x.pcap").exists());
}

#[test]
fn relative_time_dump() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(&config_in(dir.path(), None));
    let input = "0.918318 10.0.0.1.443 -> 10.0.0.2.51000: psh 1 ack 1\n\
                 0x0000\t 4500 0028\t E..(\n\
                 90.000007 10.0.0.2.51000 -> 10.0.0.1.443: ack 2\n\
                 0x0000\t 4500 0029\t E..)\n";
    pipeline.run(input.as_bytes()).unwrap();

    let start = Local.with_ymd_and_hms(2024, 1, 15, 14, 23, 0).unwrap().timestamp() as u32;
    let pcap = Pcap::read_all(dir.path().join("fgs20240115-1423.pcap")).unwrap();
    assert_eq!(pcap.records.len(), 2);
    assert_eq!(pcap.records[0].ts_sec, start);
    assert_eq!(pcap.records[0].ts_subsec, 918318);
    assert_eq!(pcap.records[1].ts_sec, start + 90);
    assert_eq!(pcap.records[1].ts_subsec, 7);
}
