//! Console command parsing.

use anyhow::{Result, anyhow, bail};
use bureau_core::{ContextOption, InkCartridge, Item, Paper};

/// One console command.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    ToggleTray,
    ToggleLid,
    Print,
    Scan,
    ClearScan,
    Menu(ContextOption),
    /// Apply whatever is in hand to the device.
    Use,
    Hold(Option<Item>),
    Status,
    Wait(u64),
    Device(u32),
    Say(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  tray | lid            toggle the paper tray / scanner lid
  print | scan          start a job
  clear                 forget the last scan
  mode | eject          context menu: switch printing mode / remove cartridge
  hold paper [text]     pick up a sheet (blank without text)
  hold cart [ink]       pick up an ink cartridge
  hold nothing          empty your hand
  use                   apply your hand to the copier
  status                show the copier status
  wait <ms>             let time pass
  device <n>            switch to another copier
  say <text>            chat
  quit";

impl Input {
    pub fn parse(line: &str, cartridge_capacity: u32) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let input = match word.to_ascii_lowercase().as_str() {
            "tray" => Input::ToggleTray,
            "lid" => Input::ToggleLid,
            "print" => Input::Print,
            "scan" => Input::Scan,
            "clear" => Input::ClearScan,
            "mode" => Input::Menu(ContextOption::SwitchPrintingMode),
            "eject" => Input::Menu(ContextOption::RemoveInkCartridge),
            "use" => Input::Use,
            "hold" => Input::Hold(parse_item(rest, cartridge_capacity)?),
            "status" => Input::Status,
            "wait" => Input::Wait(
                rest.parse()
                    .map_err(|_| anyhow!("wait needs milliseconds, got {:?}", rest))?,
            ),
            "device" => Input::Device(
                rest.parse()
                    .map_err(|_| anyhow!("device needs a number, got {:?}", rest))?,
            ),
            "say" => Input::Say(rest.to_string()),
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command {:?} (try `help`)", other),
        };
        Ok(input)
    }
}

fn parse_item(spec: &str, cartridge_capacity: u32) -> Result<Option<Item>> {
    let (kind, rest) = match spec.split_once(char::is_whitespace) {
        Some((kind, rest)) => (kind, rest.trim()),
        None => (spec, ""),
    };
    match kind {
        "paper" if rest.is_empty() => Ok(Some(Paper::blank().into())),
        "paper" => Ok(Some(Paper::with_text(rest).into())),
        "cart" | "cartridge" if rest.is_empty() => {
            Ok(Some(InkCartridge::full(cartridge_capacity).into()))
        }
        "cart" | "cartridge" => {
            let ink = rest
                .parse()
                .map_err(|_| anyhow!("ink level must be a number, got {:?}", rest))?;
            Ok(Some(InkCartridge::new(ink, cartridge_capacity).into()))
        }
        "nothing" | "" => Ok(None),
        other => Ok(Some(Item::Other {
            name: other.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_commands() {
        assert_eq!(Input::parse("tray", 30).unwrap(), Input::ToggleTray);
        assert_eq!(Input::parse("  SCAN ", 30).unwrap(), Input::Scan);
        assert_eq!(
            Input::parse("eject", 30).unwrap(),
            Input::Menu(ContextOption::RemoveInkCartridge)
        );
        assert_eq!(Input::parse("wait 4000", 30).unwrap(), Input::Wait(4_000));
    }

    #[test]
    fn parses_held_items() {
        assert_eq!(
            Input::parse("hold paper quarterly report", 30).unwrap(),
            Input::Hold(Some(Paper::with_text("quarterly report").into()))
        );
        assert_eq!(
            Input::parse("hold cart 5", 30).unwrap(),
            Input::Hold(Some(InkCartridge::new(5, 30).into()))
        );
        assert_eq!(Input::parse("hold nothing", 30).unwrap(), Input::Hold(None));
    }

    #[test]
    fn say_keeps_text_verbatim() {
        assert_eq!(
            Input::parse("say HELLO   there", 30).unwrap(),
            Input::Say("HELLO   there".into())
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Input::parse("wait soon", 30).is_err());
        assert!(Input::parse("frobnicate", 30).is_err());
        assert!(Input::parse("", 30).is_err());
    }
}
