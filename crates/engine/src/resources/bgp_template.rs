//! `/routing/bgp/template`: reusable BGP session parameters.

use std::time::Duration;

use super::common;
use crate::diff::Equivalence;
use crate::schema::{Attribute, ResourceSchema, Schema, Validator};
use crate::value::Value;

const ADDRESS_FAMILIES: &[&str] = &["ip", "ipv6", "l2vpn", "l2vpn-cisco", "vpnv4"];
const REDISTRIBUTE: &[&str] = &[
    "bgp",
    "connected",
    "bgp-mpls-vpn",
    "dhcp",
    "fantasy",
    "modem",
    "ospf",
    "rip",
    "static",
    "vpn",
];

pub fn bgp_template() -> ResourceSchema {
    let schema = Schema::new([
        Attribute::string("add_path_out")
            .default("none")
            .validator(Validator::OneOf(&["all", "none"])),
        Attribute::set("address_families")
            .default(Value::set(["ip"]))
            .validator(Validator::EachOneOf(ADDRESS_FAMILIES)),
        // AS-plain, AS-dot or confederation/as
        Attribute::string("as").required(),
        Attribute::bool("as_override"),
        Attribute::string("cisco_vpls_nlri_len_fmt")
            .validator(Validator::OneOf(&["auto-bits", "auto-bytes", "bits", "bytes"])),
        Attribute::string("cluster_id").validator(Validator::Ipv4),
        common::comment(),
        common::disabled(),
        Attribute::string("hold_time")
            .default("3m")
            .validator(Validator::DurationRange(
                Duration::from_secs(3),
                Duration::from_secs(3_600),
            ))
            .equivalence(Equivalence::Duration),
        Attribute::block("input", input()),
        Attribute::string("keepalive_time")
            .default("3m")
            .validator(Validator::Duration)
            .equivalence(Equivalence::Duration),
        Attribute::bool("multihop"),
        common::name(),
        Attribute::string("nexthop_choice")
            .default("default")
            .validator(Validator::OneOf(&["default", "force-self", "propagate"])),
        Attribute::block("output", output()),
        Attribute::bool("remove_private_as"),
        Attribute::string("router_id"),
        Attribute::string("routing_table").computed(),
        Attribute::string("save_to"),
        Attribute::set("templates"),
        Attribute::bool("use_bfd"),
        Attribute::string("vrf").default("main"),
    ]);

    ResourceSchema::new("bgp_template", "/routing/bgp/template", schema).natural_key("name")
}

fn input() -> Schema {
    Schema::new([
        Attribute::string("accept_comunities").device_key("accept-communities"),
        Attribute::string("accept_ext_communities"),
        Attribute::string("accept_large_comunities").device_key("accept-large-communities"),
        // ipv4/6 address-list name
        Attribute::string("accept_nlri"),
        Attribute::string("accept_unknown"),
        Attribute::string("affinity"),
        Attribute::int("allow_as").validator(Validator::IntRange(0, 10)),
        Attribute::string("filter"),
        Attribute::bool("ignore_as_path_len"),
        Attribute::int("limit_process_routes_ipv4"),
        Attribute::int("limit_process_routes_ipv6"),
    ])
}

fn output() -> Schema {
    Schema::new([
        Attribute::string("affinity"),
        Attribute::string("default_originate")
            .validator(Validator::OneOf(&["always", "if-installed", "never"])),
        Attribute::int("default_prepend").validator(Validator::IntRange(0, 255)),
        Attribute::string("filter_chain"),
        Attribute::string("filter_select"),
        Attribute::bool("keep_sent_attributes"),
        Attribute::string("network"),
        Attribute::bool("no_client_to_client_reflection"),
        Attribute::bool("no_early_cut"),
        Attribute::set("redistribute").validator(Validator::EachOneOf(REDISTRIBUTE)),
    ])
}
