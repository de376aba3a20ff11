//! Built-in thermochemical data for H/O/C/N propellant systems.
//!
//! Product species use 7-coefficient polynomial fits (two intervals each
//! for gases). Ingredient heats of formation are at 298.15 K.

use crate::species::Phase;

pub(crate) struct SpeciesRecord {
    pub name: &'static str,
    pub formula: &'static str,
    pub phase: Phase,
    pub intervals: &'static [(f64, f64, [f64; 7])],
}

pub(crate) struct PropellantRecord {
    pub name: &'static str,
    pub formula: &'static str,
    /// [J/mol]
    pub heat_of_formation: f64,
    /// [g/cm^3]
    pub density: f64,
}

const fn gas(
    name: &'static str,
    formula: &'static str,
    intervals: &'static [(f64, f64, [f64; 7])],
) -> SpeciesRecord {
    SpeciesRecord {
        name,
        formula,
        phase: Phase::Gas,
        intervals,
    }
}

const fn condensed(
    name: &'static str,
    formula: &'static str,
    intervals: &'static [(f64, f64, [f64; 7])],
) -> SpeciesRecord {
    SpeciesRecord {
        name,
        formula,
        phase: Phase::Condensed,
        intervals,
    }
}

pub(crate) const SPECIES: &[SpeciesRecord] = &[
    gas(
        "H",
        "H",
        &[
            (200.0, 1000.0, [2.5, 0.0, 0.0, 0.0, 0.0, 2.54736599E+04, -4.46682853E-01]),
            (
                1000.0,
                3500.0,
                [2.50000001E+00, -2.30842973E-11, 1.61561948E-14, -4.73515235E-18, 4.98197357E-22, 2.54736599E+04, -4.46682914E-01],
            ),
        ],
    ),
    gas(
        "H2",
        "H2",
        &[
            (
                200.0,
                1000.0,
                [2.34433112E+00, 7.98052075E-03, -1.94781510E-05, 2.01572094E-08, -7.37611761E-12, -9.17935173E+02, 6.83010238E-01],
            ),
            (
                1000.0,
                3500.0,
                [3.33727920E+00, -4.94024731E-05, 4.99456778E-07, -1.79566394E-10, 2.00255376E-14, -9.50158922E+02, -3.20502331E+00],
            ),
        ],
    ),
    gas(
        "O",
        "O",
        &[
            (
                200.0,
                1000.0,
                [3.16826710E+00, -3.27931884E-03, 6.64306396E-06, -6.12806624E-09, 2.11265971E-12, 2.91222592E+04, 2.05193346E+00],
            ),
            (
                1000.0,
                3500.0,
                [2.56942078E+00, -8.59741137E-05, 4.19484589E-08, -1.00177799E-11, 1.22833691E-15, 2.92175791E+04, 4.78433864E+00],
            ),
        ],
    ),
    gas(
        "O2",
        "O2",
        &[
            (
                200.0,
                1000.0,
                [3.78245636E+00, -2.99673416E-03, 9.84730201E-06, -9.68129509E-09, 3.24372837E-12, -1.06394356E+03, 3.65767573E+00],
            ),
            (
                1000.0,
                3500.0,
                [3.28253784E+00, 1.48308754E-03, -7.57966669E-07, 2.09470555E-10, -2.16717794E-14, -1.08845772E+03, 5.45323129E+00],
            ),
        ],
    ),
    gas(
        "OH",
        "OH",
        &[
            (
                200.0,
                1000.0,
                [3.99201543E+00, -2.40131752E-03, 4.61793841E-06, -3.88113333E-09, 1.36411470E-12, 3.61508056E+03, -1.03925458E-01],
            ),
            (
                1000.0,
                3500.0,
                [3.09288767E+00, 5.48429716E-04, 1.26505228E-07, -8.79461556E-11, 1.17412376E-14, 3.85865700E+03, 4.47669610E+00],
            ),
        ],
    ),
    gas(
        "H2O",
        "H2O",
        &[
            (
                200.0,
                1000.0,
                [4.19864056E+00, -2.03643410E-03, 6.52040211E-06, -5.48797062E-09, 1.77197817E-12, -3.02937267E+04, -8.49032208E-01],
            ),
            (
                1000.0,
                3500.0,
                [3.03399249E+00, 2.17691804E-03, -1.64072518E-07, -9.70419870E-11, 1.68200992E-14, -3.00042971E+04, 4.96677010E+00],
            ),
        ],
    ),
    gas(
        "HO2",
        "HO2",
        &[
            (
                200.0,
                1000.0,
                [4.30179801E+00, -4.74912051E-03, 2.11582891E-05, -2.42763894E-08, 9.29225124E-12, 2.94808040E+02, 3.71666245E+00],
            ),
            (
                1000.0,
                3500.0,
                [4.01721090E+00, 2.23982013E-03, -6.33658150E-07, 1.14246370E-10, -1.07908535E-14, 1.11856713E+02, 3.78510215E+00],
            ),
        ],
    ),
    gas(
        "H2O2",
        "H2O2",
        &[
            (
                200.0,
                1000.0,
                [4.27611269E+00, -5.42822417E-04, 1.67335701E-05, -2.15770813E-08, 8.62454363E-12, -1.77025821E+04, 3.43505074E+00],
            ),
            (
                1000.0,
                3500.0,
                [4.16500285E+00, 4.90831694E-03, -1.90139225E-06, 3.71185986E-10, -2.87908305E-14, -1.78617877E+04, 2.91615662E+00],
            ),
        ],
    ),
    gas(
        "C",
        "C",
        &[
            (
                200.0,
                1000.0,
                [2.55423955E+00, -3.21537724E-04, 7.33792245E-07, -7.32234889E-10, 2.66521446E-13, 8.54438832E+04, 4.53130848E+00],
            ),
            (
                1000.0,
                3500.0,
                [2.49266888E+00, 4.79889284E-05, -7.24335020E-08, 3.74291029E-11, -4.87277893E-15, 8.54512953E+04, 4.80150373E+00],
            ),
        ],
    ),
    gas(
        "CO",
        "CO",
        &[
            (
                200.0,
                1000.0,
                [3.57953347E+00, -6.10353680E-04, 1.01681433E-06, 9.07005884E-10, -9.04424499E-13, -1.43440860E+04, 3.50840928E+00],
            ),
            (
                1000.0,
                3500.0,
                [2.71518561E+00, 2.06252743E-03, -9.98825771E-07, 2.30053008E-10, -2.03647716E-14, -1.41518724E+04, 7.81868772E+00],
            ),
        ],
    ),
    gas(
        "CO2",
        "CO2",
        &[
            (
                200.0,
                1000.0,
                [2.35677352E+00, 8.98459677E-03, -7.12356269E-06, 2.45919022E-09, -1.43699548E-13, -4.83719697E+04, 9.90105222E+00],
            ),
            (
                1000.0,
                3500.0,
                [3.85746029E+00, 4.41437026E-03, -2.21481404E-06, 5.23490188E-10, -4.72084164E-14, -4.87591660E+04, 2.27163806E+00],
            ),
        ],
    ),
    gas(
        "CH4",
        "CH4",
        &[
            (
                200.0,
                1000.0,
                [5.14987613E+00, -1.36709788E-02, 4.91800599E-05, -4.84743026E-08, 1.66693956E-11, -1.02466476E+04, -4.64130376E+00],
            ),
            (
                1000.0,
                3500.0,
                [7.48514950E-02, 1.33909467E-02, -5.73285809E-06, 1.22292535E-09, -1.01815230E-13, -9.46834459E+03, 1.84373180E+01],
            ),
        ],
    ),
    gas(
        "N",
        "N",
        &[
            (200.0, 1000.0, [2.5, 0.0, 0.0, 0.0, 0.0, 5.6104637E+04, 4.1939087]),
            (
                1000.0,
                6000.0,
                [2.4159429, 1.7489065E-04, -1.1902369E-07, 3.0226245E-11, -2.0360982E-15, 5.6133773E+04, 4.6496096],
            ),
        ],
    ),
    gas(
        "N2",
        "N2",
        &[
            (
                300.0,
                1000.0,
                [3.298677, 1.4082404E-03, -3.963222E-06, 5.641515E-09, -2.444854E-12, -1.0208999E+03, 3.950372],
            ),
            (
                1000.0,
                5000.0,
                [2.92664, 1.4879768E-03, -5.68476E-07, 1.0097038E-10, -6.753351E-15, -9.227977E+02, 5.980528],
            ),
        ],
    ),
    gas(
        "NO",
        "NO",
        &[
            (
                200.0,
                1000.0,
                [4.21847630E+00, -4.63897600E-03, 1.10410220E-05, -9.33613540E-09, 2.80357700E-12, 9.84462300E+03, 2.28084640E+00],
            ),
            (
                1000.0,
                6000.0,
                [3.26060560E+00, 1.19110430E-03, -4.29170480E-07, 6.94576690E-11, -4.03360990E-15, 9.92097460E+03, 6.36930270E+00],
            ),
        ],
    ),
    gas(
        "NH3",
        "NH3",
        &[
            (
                200.0,
                1000.0,
                [4.28602740E+00, -4.66052300E-03, 2.17185130E-05, -2.28088870E-08, 8.26380460E-12, -6.74172850E+03, -6.25372770E-01],
            ),
            (
                1000.0,
                6000.0,
                [2.63445210E+00, 5.66625600E-03, -1.72786760E-06, 2.38671610E-10, -1.25787860E-14, -6.54469580E+03, 6.56629280E+00],
            ),
        ],
    ),
    condensed(
        "C(gr)",
        "C",
        &[
            (
                200.0,
                1000.0,
                [-3.10872072E-01, 4.40353686E-03, 1.90394118E-06, -6.38546966E-09, 2.98964248E-12, -1.08650794E+02, 1.11382953E+00],
            ),
            (
                1000.0,
                5000.0,
                [1.45571829E+00, 1.71702216E-03, -6.97562786E-07, 1.35277032E-10, -9.67590652E-15, -6.95138814E+02, -8.52583033E+00],
            ),
        ],
    ),
    condensed(
        "H2O(L)",
        "H2O",
        &[(
            273.15,
            373.15,
            [7.25575005E+01, -6.62445402E-01, 2.56198746E-03, -4.36591923E-06, 2.78178981E-09, -4.18865499E+04, -2.88280137E+02],
        )],
    ),
];

pub(crate) const PROPELLANTS: &[PropellantRecord] = &[
    PropellantRecord {
        name: "H2",
        formula: "H2",
        heat_of_formation: 0.0,
        density: 8.988e-5,
    },
    PropellantRecord {
        name: "O2",
        formula: "O2",
        heat_of_formation: 0.0,
        density: 1.429e-3,
    },
    PropellantRecord {
        name: "N2",
        formula: "N2",
        heat_of_formation: 0.0,
        density: 1.251e-3,
    },
    PropellantRecord {
        name: "H2(L)",
        formula: "H2",
        heat_of_formation: -9_012.0,
        density: 0.0708,
    },
    PropellantRecord {
        name: "O2(L)",
        formula: "O2",
        heat_of_formation: -12_979.0,
        density: 1.141,
    },
    PropellantRecord {
        name: "CH4",
        formula: "CH4",
        heat_of_formation: -74_870.0,
        density: 6.57e-4,
    },
    PropellantRecord {
        name: "NH3",
        formula: "NH3",
        heat_of_formation: -45_900.0,
        density: 7.69e-4,
    },
    PropellantRecord {
        name: "C(gr)",
        formula: "C",
        heat_of_formation: 0.0,
        density: 2.26,
    },
    PropellantRecord {
        name: "N2O4(L)",
        formula: "N2O4",
        heat_of_formation: -19_560.0,
        density: 1.443,
    },
    PropellantRecord {
        name: "N2H4(L)",
        formula: "N2H4",
        heat_of_formation: 50_630.0,
        density: 1.004,
    },
    PropellantRecord {
        name: "H2O2(L)",
        formula: "H2O2",
        heat_of_formation: -187_800.0,
        density: 1.45,
    },
    PropellantRecord {
        name: "C2H5OH(L)",
        formula: "C2H5OH",
        heat_of_formation: -277_000.0,
        density: 0.789,
    },
];
