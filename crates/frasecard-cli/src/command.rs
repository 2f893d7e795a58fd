//! Parsing of interactive commands.

use std::path::PathBuf;
use std::str::FromStr;

use frasecard_engine::DraftField;

/// Shown by `help`.
pub const HELP: &str = "\
Commands:
  sentence <text>         enter a new sentence
  tokens                  list the tokens of the sentence
  blank <i>               start a fill-in-the-blank card on token i
  define <i>              start a vocabulary card on token i
  pronounce               look up article and IPA for the vocabulary card
  search <query>          search images with your own query
  image <n|url|path>      use candidate n, a URL or a local file as the image
  upload-image <path>     copy a picture into the media folder and use it
  audio <path>            copy a recording into the media folder and attach it
  edit <field> <value>    set clue, article, ipa, hint or info
  show                    show the card being edited
  commit                  add the card to the deck
  discard                 drop the card being edited
  cards                   list added cards
  remove <n>              remove added card n
  export [file]           write all added cards to an .apkg file
  help                    show this help
  quit                    leave";

/// What to use as the draft's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChoice {
    /// One-based position in the candidate list.
    Candidate(usize),
    /// Anything else, used verbatim.
    Url(String),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sentence(String),
    Tokens,
    Blank(usize),
    Define(usize),
    Pronounce,
    Search(String),
    Image(ImageChoice),
    UploadImage(PathBuf),
    Audio(PathBuf),
    Edit(DraftField, String),
    Show,
    Commit,
    Discard,
    Cards,
    Remove(usize),
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "sentence" => Command::Sentence(required(rest, "sentence <text>")?.to_string()),
            "tokens" => Command::Tokens,
            "blank" => Command::Blank(number(rest, "blank <i>")?),
            "define" => Command::Define(number(rest, "define <i>")?),
            "pronounce" => Command::Pronounce,
            "search" => Command::Search(required(rest, "search <query>")?.to_string()),
            "image" => {
                let arg = required(rest, "image <n|url|path>")?;
                match arg.parse::<usize>() {
                    Ok(0) => return Err("candidates are numbered from 1".to_string()),
                    Ok(n) => Command::Image(ImageChoice::Candidate(n)),
                    Err(_) => Command::Image(ImageChoice::Url(arg.to_string())),
                }
            }
            "upload-image" => {
                Command::UploadImage(required(rest, "upload-image <path>")?.into())
            }
            "audio" => Command::Audio(required(rest, "audio <path>")?.into()),
            "edit" => {
                let args = required(rest, "edit <field> <value>")?;
                let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                let field = field.parse::<DraftField>().map_err(|e| e.to_string())?;
                Command::Edit(field, value.trim().to_string())
            }
            "show" => Command::Show,
            "commit" => Command::Commit,
            "discard" => Command::Discard,
            "cards" => Command::Cards,
            "remove" => match number(rest, "remove <n>")? {
                0 => return Err("cards are numbered from 1".to_string()),
                n => Command::Remove(n),
            },
            "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}'. Type 'help'", other)),
        };
        Ok(command)
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(arg)
    }
}

fn number(arg: &str, usage: &str) -> Result<usize, String> {
    required(arg, usage)?
        .parse()
        .map_err(|_| format!("usage: {}", usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("tokens".parse(), Ok(Command::Tokens));
        assert_eq!("  COMMIT ".parse(), Ok(Command::Commit));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert_eq!("blank 3".parse(), Ok(Command::Blank(3)));
    }

    #[test]
    fn test_parse_keeps_text_arguments() {
        assert_eq!(
            "sentence  ¿Dónde está el gato? ".parse(),
            Ok(Command::Sentence("¿Dónde está el gato?".to_string()))
        );
        assert_eq!(
            "edit hint animal de casa".parse(),
            Ok(Command::Edit(DraftField::Hint, "animal de casa".to_string()))
        );
        assert_eq!(
            "edit ipa".parse(),
            Ok(Command::Edit(DraftField::Ipa, String::new()))
        );
    }

    #[test]
    fn test_parse_image_choice() {
        assert_eq!(
            "image 2".parse(),
            Ok(Command::Image(ImageChoice::Candidate(2)))
        );
        assert_eq!(
            "image https://img.test/a.jpg".parse(),
            Ok(Command::Image(ImageChoice::Url(
                "https://img.test/a.jpg".to_string()
            )))
        );
        assert!("image 0".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_export() {
        assert_eq!("export".parse(), Ok(Command::Export(None)));
        assert_eq!(
            "export mazo.apkg".parse(),
            Ok(Command::Export(Some(PathBuf::from("mazo.apkg"))))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("blank".parse::<Command>().is_err());
        assert!("blank x".parse::<Command>().is_err());
        assert!("remove 0".parse::<Command>().is_err());
        assert!("edit front hola".parse::<Command>().is_err());
        assert!("fly".parse::<Command>().unwrap_err().contains("unknown command"));
    }
}
