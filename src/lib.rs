pub mod configuration;

pub mod attenuation {
    pub mod attenuationerror;
    pub mod parameterwarning;
    pub mod attenuationrelationship;
    pub mod kemptonstewart2006;
    pub mod attenuationmanager;
}

pub mod magdist {
    pub mod magfreqdisterror;
    pub mod momentmagnitude;
    pub mod magfreqdist;
    pub mod gutenbergrichtermagfreqdist;
    pub mod magfreqdistmanager;
}

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod function {
        pub mod discretizedfunction;
    }
    pub mod round;
}

pub mod validation {
    pub mod numerictable;
}
