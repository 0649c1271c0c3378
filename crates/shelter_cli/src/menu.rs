//! Interactive shelter menu.
//!
//! # Responsibility
//! - Present the six menu options and dispatch to shelter use cases.
//! - Render search results and adoption outcomes.
//!
//! # Invariants
//! - Storage and validation failures are reported and the loop continues.
//! - Only I/O failures end the loop with an error.
//! - End of input behaves like choosing "Exit".

use crate::console::Console;
use log::{info, warn};
use shelter_core::{
    first_adoptable, Animal, AnimalRepository, AnimalStatus, FamilyRepository, NewAnimal,
    NewFamily, RepoError, ServiceError, ShelterService,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

/// Species offered as hints; any text is accepted.
const KNOWN_SPECIES: &[&str] = &[
    "Dog",
    "Cat",
    "Bird",
    "Vietnamese pig",
    "Snake",
    "Chameleon",
    "Spider",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    RegisterAnimal,
    SearchBySpecies,
    SearchByAge,
    SearchByDescription,
    RegisterFamily,
    Exit,
}

impl MenuOption {
    fn from_number(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::RegisterAnimal),
            2 => Some(Self::SearchBySpecies),
            3 => Some(Self::SearchByAge),
            4 => Some(Self::SearchByDescription),
            5 => Some(Self::RegisterFamily),
            6 => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Failure of one menu action.
#[derive(Debug)]
pub enum MenuError {
    Io(io::Error),
    Repo(RepoError),
    Service(ServiceError),
}

impl Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console I/O failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MenuError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<io::Error> for MenuError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for MenuError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ServiceError> for MenuError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Runs the menu until the user exits or input ends.
pub fn run_menu<R, W, A, F>(
    service: &ShelterService<A, F>,
    console: &mut Console<R, W>,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    A: AnimalRepository,
    F: FamilyRepository,
{
    loop {
        print_menu(console)?;
        let Some(choice) = console.prompt_number::<u32>("Select an option: ")? else {
            break;
        };

        let Some(option) = MenuOption::from_number(choice) else {
            console.say("Invalid option, please try again.")?;
            continue;
        };

        match dispatch(option, service, console) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(MenuError::Io(err)) => return Err(err),
            Err(err) => {
                warn!("event=menu_action module=cli status=error option={option:?} error={err}");
                console.say(format!("Error: {err}"))?;
            }
        }
    }

    console.say("Exiting...")?;
    info!("event=menu_exit module=cli status=ok");
    Ok(())
}

fn print_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<()> {
    console.say("")?;
    console.say("=== Animal Shelter Menu ===")?;
    console.say("1. Register new animal")?;
    console.say("2. Search animals by species")?;
    console.say("3. Search animals by age")?;
    console.say("4. Search animals by description")?;
    console.say("5. Register family adopting an animal")?;
    console.say("6. Exit")
}

fn dispatch<R, W, A, F>(
    option: MenuOption,
    service: &ShelterService<A, F>,
    console: &mut Console<R, W>,
) -> Result<Flow, MenuError>
where
    R: BufRead,
    W: Write,
    A: AnimalRepository,
    F: FamilyRepository,
{
    match option {
        MenuOption::RegisterAnimal => register_animal(service, console),
        MenuOption::SearchBySpecies => {
            let label = format!("Species to search for ({}): ", KNOWN_SPECIES.join(", "));
            let Some(species) = console.prompt_line(&label)? else {
                return Ok(Flow::Exit);
            };
            let animals = service.search_by_species(&species)?;
            print_animals(console, &animals, "No animals found with that species.")?;
            Ok(Flow::Continue)
        }
        MenuOption::SearchByAge => {
            let Some(age) = console.prompt_number::<u32>("Age of the animals to search for: ")?
            else {
                return Ok(Flow::Exit);
            };
            let animals = service.search_by_age(age)?;
            print_animals(console, &animals, "No animals found with that age.")?;
            Ok(Flow::Continue)
        }
        MenuOption::SearchByDescription => {
            let Some(fragment) = console.prompt_line("Description to search for: ")? else {
                return Ok(Flow::Exit);
            };
            let animals = service.search_by_description(&fragment)?;
            print_animals(console, &animals, "No animals found with that description.")?;
            Ok(Flow::Continue)
        }
        MenuOption::RegisterFamily => register_family(service, console),
        MenuOption::Exit => Ok(Flow::Exit),
    }
}

fn register_animal<R, W, A, F>(
    service: &ShelterService<A, F>,
    console: &mut Console<R, W>,
) -> Result<Flow, MenuError>
where
    R: BufRead,
    W: Write,
    A: AnimalRepository,
    F: FamilyRepository,
{
    console.say("Enter the new animal's details:")?;
    let Some(name) = console.prompt_line("Name: ")? else {
        return Ok(Flow::Exit);
    };
    let species_label = format!("Species ({}): ", KNOWN_SPECIES.join(", "));
    let Some(species) = console.prompt_line(&species_label)? else {
        return Ok(Flow::Exit);
    };
    let Some(age) = console.prompt_number::<u32>("Age: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(description) = console.prompt_line("Description: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(status) = prompt_status(console)? else {
        return Ok(Flow::Exit);
    };

    let animal = service.register_animal(NewAnimal {
        name,
        species,
        age,
        description,
        status,
    })?;
    info!(
        "event=menu_register_animal module=cli status=ok id={}",
        animal.id.unwrap_or_default()
    );
    console.say("Animal registered successfully.")?;
    Ok(Flow::Continue)
}

/// `Ok(None)` on end of input, `Ok(Some(None))` when left blank.
fn prompt_status<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> io::Result<Option<Option<AnimalStatus>>> {
    let label = format!(
        "Status ({}; leave blank for none): ",
        AnimalStatus::valid_labels()
    );
    loop {
        let Some(answer) = console.prompt_line(&label)? else {
            return Ok(None);
        };
        if answer.trim().is_empty() {
            return Ok(Some(None));
        }
        match AnimalStatus::parse(&answer) {
            Ok(status) => return Ok(Some(Some(status))),
            Err(err) => console.say(err.to_string())?,
        }
    }
}

fn register_family<R, W, A, F>(
    service: &ShelterService<A, F>,
    console: &mut Console<R, W>,
) -> Result<Flow, MenuError>
where
    R: BufRead,
    W: Write,
    A: AnimalRepository,
    F: FamilyRepository,
{
    console.say("Animals available for adoption:")?;
    let animals = service.list_animals()?;
    if animals.is_empty() {
        console.say("There are no animals in the shelter.")?;
        return Ok(Flow::Continue);
    }
    for animal in &animals {
        console.say(animal.to_string())?;
    }

    let Some(species) = console.prompt_line("Species of the animal to adopt: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(animal) = first_adoptable(&animals, &species) else {
        console.say("No animal found with that species.")?;
        return Ok(Flow::Continue);
    };

    console.say("Enter the family's details:")?;
    let Some(name) = console.prompt_line("Family name: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(age) = console.prompt_number::<u32>("Family age: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(city) = console.prompt_line("Family city: ")? else {
        return Ok(Flow::Exit);
    };

    let (animal, family) = service.adopt(animal.clone(), NewFamily { name, age, city })?;
    console.say(format!("{family} has adopted {}.", animal.name))?;
    Ok(Flow::Continue)
}

fn print_animals<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    animals: &[Animal],
    empty_message: &str,
) -> io::Result<()> {
    if animals.is_empty() {
        return console.say(empty_message);
    }
    for animal in animals {
        console.say(animal.to_string())?;
    }
    Ok(())
}
