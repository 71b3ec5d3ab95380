mod ordering;
