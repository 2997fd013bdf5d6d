use anyhow::bail;
use colored::Colorize;
use lv2kit::{Node, Nodes, Plugin, World};
use serde::Serialize;

const LV2_NAME: &str = "http://lv2plug.in/ns/lv2core#name";

#[derive(Serialize, Debug)]
pub struct PluginInfo {
    pub uri: String,
    pub name: Option<String>,
    pub class: String,
    pub bundle: String,
    pub binary: Option<String>,
    pub data_files: Vec<String>,
    pub replaced: bool,
    pub valid: bool,
    pub author: Option<AuthorInfo>,
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
    pub latency_port: Option<u32>,
    pub ports: Vec<PortInfo>,
    pub uis: Vec<UiInfo>,
}

#[derive(Serialize, Debug)]
pub struct AuthorInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub homepage: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PortInfo {
    pub index: u32,
    pub symbol: String,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub minimum: Option<f32>,
    pub maximum: Option<f32>,
    pub default: Option<f32>,
}

#[derive(Serialize, Debug)]
pub struct UiInfo {
    pub uri: String,
    pub class: String,
    pub binary: String,
}

fn strings(nodes: Option<Nodes>) -> Vec<String> {
    nodes
        .map(|nodes| nodes.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

fn finite(value: f32) -> Option<f32> {
    (!value.is_nan()).then_some(value)
}

impl PluginInfo {
    /// Gather everything the accessors report about `plugin`
    pub fn collect(plugin: &Plugin) -> Self {
        let name_predicate = Node::uri(LV2_NAME);
        let ranges = plugin.port_ranges_float();
        let ports = plugin
            .ports()
            .into_iter()
            .flatten()
            .map(|port| {
                let i = port.index() as usize;
                PortInfo {
                    index: port.index(),
                    symbol: port.symbol().to_string(),
                    name: plugin
                        .port_value(&port, &name_predicate)
                        .and_then(|names| names.into_iter().find(Node::is_string))
                        .map(|name| name.to_string()),
                    classes: port.classes().iter().map(ToString::to_string).collect(),
                    minimum: ranges.minimum.get(i).copied().and_then(finite),
                    maximum: ranges.maximum.get(i).copied().and_then(finite),
                    default: ranges.default.get(i).copied().and_then(finite),
                }
            })
            .collect();

        let author_name = plugin.author_name().map(|n| n.to_string());
        let email = plugin.author_email().map(|n| n.to_string());
        let homepage = plugin.author_homepage().map(|n| n.to_string());
        let author = (author_name.is_some() || email.is_some() || homepage.is_some()).then(|| {
            AuthorInfo {
                name: author_name,
                email,
                homepage,
            }
        });

        PluginInfo {
            uri: plugin.uri().to_string(),
            name: plugin.name().map(|n| n.to_string()),
            class: plugin.class().label().to_string(),
            bundle: plugin.bundle_uri().to_string(),
            binary: plugin.binary_uri().map(|n| n.to_string()),
            data_files: plugin.data_uris().iter().map(ToString::to_string).collect(),
            replaced: plugin.is_replaced(),
            valid: plugin.verify(),
            author,
            required_features: strings(plugin.required_features()),
            optional_features: strings(plugin.optional_features()),
            latency_port: plugin.latency_port_index(),
            ports,
            uis: plugin
                .uis()
                .unwrap_or_default()
                .into_iter()
                .map(|ui| UiInfo {
                    uri: ui.uri().to_string(),
                    class: ui.class().to_string(),
                    binary: ui.binary().to_string(),
                })
                .collect(),
        }
    }
}

pub fn show_info(world: &World, uri: &str, json: bool) -> anyhow::Result<()> {
    let Some(plugin) = world.plugin_by_uri(uri) else {
        bail!("Plugin <{}> not found", uri);
    };
    let info = PluginInfo::collect(plugin);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    print!("{} {}", "Plugin:".bold().green(), info.uri.bold().blue());
    if info.replaced {
        print!(" {}", "[replaced]".yellow());
    }
    println!();

    let field = |label: &str, value: Option<&str>| {
        println!(
            "  {:<10} {}",
            format!("{}:", label).cyan(),
            value.map_or_else(|| "-".dimmed().to_string(), str::to_string)
        );
    };
    field("Name", info.name.as_deref());
    field("Class", Some(&info.class));
    field("Bundle", Some(&info.bundle));
    field("Binary", info.binary.as_deref());
    if let Some(author) = &info.author {
        field("Author", author.name.as_deref());
        field("Email", author.email.as_deref());
        field("Homepage", author.homepage.as_deref());
    }
    if !info.valid {
        println!("  {}", "Missing a type, name or port".yellow());
    }

    println!("\n{}", "Data files:".bold());
    for file in &info.data_files {
        println!("  {}", file);
    }

    if !info.required_features.is_empty() || !info.optional_features.is_empty() {
        println!("\n{}", "Features:".bold());
        for feature in &info.required_features {
            println!("  {} {}", feature, "(required)".dimmed());
        }
        for feature in &info.optional_features {
            println!("  {}", feature);
        }
    }

    println!("\n{}", "Ports:".bold());
    for port in &info.ports {
        let mut line = format!("  {:>3} {}", port.index, port.symbol.bold());
        if let Some(name) = &port.name {
            line.push_str(&format!(" \"{}\"", name));
        }
        if let (Some(min), Some(max)) = (port.minimum, port.maximum) {
            line.push_str(&format!(" [{} .. {}]", min, max));
        }
        if let Some(default) = port.default {
            line.push_str(&format!(" = {}", default));
        }
        println!("{}", line);
        let classes: Vec<&str> = port
            .classes
            .iter()
            .map(|c| c.rsplit(|ch| ch == '#' || ch == '/').next().unwrap_or(c))
            .collect();
        println!("      {}", classes.join(", ").dimmed());
    }
    if let Some(index) = info.latency_port {
        println!("  {} port {}", "Latency:".cyan(), index);
    }

    if !info.uis.is_empty() {
        println!("\n{}", "UIs:".bold());
        for ui in &info.uis {
            println!("  {} {}", ui.uri, ui.class.dimmed());
            println!("      {}", ui.binary);
        }
    }
    Ok(())
}
